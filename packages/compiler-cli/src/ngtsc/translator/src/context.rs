/// Whether the node being translated sits directly in statement position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub is_statement: bool,
}

impl Context {
    pub fn new(is_statement: bool) -> Self {
        Self { is_statement }
    }

    pub fn with_expression_mode(&self) -> Self {
        if self.is_statement {
            Self::new(false)
        } else {
            *self
        }
    }

    pub fn with_statement_mode(&self) -> Self {
        if !self.is_statement {
            Self::new(true)
        } else {
            *self
        }
    }
}
