use angular_compiler::core::{parse_selector_to_r3_selector, R3SelectorPart, SelectorFlags};
use angular_compiler::directive_matching::CssSelector;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> R3SelectorPart {
        R3SelectorPart::Text(s.to_string())
    }

    #[test]
    fn should_split_selector_lists() {
        let selectors = CssSelector::parse("a, [b], .c").unwrap();
        assert_eq!(selectors.len(), 3);
        assert_eq!(selectors[0].to_string(), "a");
        assert_eq!(selectors[1].to_string(), "[b]");
        assert_eq!(selectors[2].to_string(), ".c");
    }

    #[test]
    fn should_keep_quoted_attribute_values() {
        let selectors = CssSelector::parse("[title=\"Some Title\"]").unwrap();
        assert_eq!(selectors[0].attrs, vec!["title", "some title"]);
    }

    #[test]
    fn should_convert_each_selector_of_a_list() {
        let result = parse_selector_to_r3_selector(Some("a, .b")).unwrap();
        assert_eq!(
            result,
            vec![
                vec![text("a")],
                vec![
                    text(""),
                    R3SelectorPart::Flags(SelectorFlags::CLASS as u32),
                    text("b")
                ],
            ]
        );
    }

    #[test]
    fn should_yield_nothing_for_missing_selectors() {
        assert!(parse_selector_to_r3_selector(None).unwrap().is_empty());
        assert!(parse_selector_to_r3_selector(Some("")).unwrap().is_empty());
    }
}
