//! Render3 Identifiers
//!
//! Angular runtime symbols referenced by generated definitions.

use crate::output::output_ast::ExternalReference;

pub const CORE: &str = "@angular/core";

/// Angular runtime identifiers used in generated code
pub struct Identifiers;

impl Identifiers {
    fn make_ref(name: Option<&str>) -> ExternalReference {
        ExternalReference {
            module_name: Some(CORE.to_string()),
            name: name.map(|s| s.to_string()),
        }
    }

    pub fn core() -> ExternalReference {
        Self::make_ref(None)
    }

    /* Definitions */
    pub fn define_component() -> ExternalReference {
        Self::make_ref(Some("ɵɵdefineComponent"))
    }

    pub fn define_directive() -> ExternalReference {
        Self::make_ref(Some("ɵɵdefineDirective"))
    }

    pub fn define_pipe() -> ExternalReference {
        Self::make_ref(Some("ɵɵdefinePipe"))
    }

    pub fn define_ng_module() -> ExternalReference {
        Self::make_ref(Some("ɵɵdefineNgModule"))
    }

    pub fn define_injector() -> ExternalReference {
        Self::make_ref(Some("ɵɵdefineInjector"))
    }

    pub fn define_injectable() -> ExternalReference {
        Self::make_ref(Some("ɵɵdefineInjectable"))
    }

    /* Features */
    pub fn providers_feature() -> ExternalReference {
        Self::make_ref(Some("ɵɵProvidersFeature"))
    }

    pub fn inherit_definition_feature() -> ExternalReference {
        Self::make_ref(Some("ɵɵInheritDefinitionFeature"))
    }

    pub fn copy_definition_feature() -> ExternalReference {
        Self::make_ref(Some("ɵɵCopyDefinitionFeature"))
    }

    pub fn ng_on_changes_feature() -> ExternalReference {
        Self::make_ref(Some("ɵɵNgOnChangesFeature"))
    }

    /* Queries */
    pub fn content_query() -> ExternalReference {
        Self::make_ref(Some("ɵɵcontentQuery"))
    }

    pub fn view_query() -> ExternalReference {
        Self::make_ref(Some("ɵɵviewQuery"))
    }

    pub fn query_refresh() -> ExternalReference {
        Self::make_ref(Some("ɵɵqueryRefresh"))
    }

    pub fn load_query() -> ExternalReference {
        Self::make_ref(Some("ɵɵloadQuery"))
    }

    /* Dependency injection */
    pub fn inject() -> ExternalReference {
        Self::make_ref(Some("ɵɵinject"))
    }

    pub fn directive_inject() -> ExternalReference {
        Self::make_ref(Some("ɵɵdirectiveInject"))
    }

    pub fn inject_attribute() -> ExternalReference {
        Self::make_ref(Some("ɵɵinjectAttribute"))
    }

    pub fn invalid_factory() -> ExternalReference {
        Self::make_ref(Some("ɵɵinvalidFactory"))
    }

    pub fn invalid_factory_dep() -> ExternalReference {
        Self::make_ref(Some("ɵɵinvalidFactoryDep"))
    }

    pub fn get_inherited_factory() -> ExternalReference {
        Self::make_ref(Some("ɵɵgetInheritedFactory"))
    }
}
