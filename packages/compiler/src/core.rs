//! Core Types
//!
//! Runtime enums and flags mirrored from `@angular/core`, plus conversion of CSS selectors
//! into the runtime's compact selector format.

use crate::directive_matching::CssSelector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ViewEncapsulation {
    Emulated = 0,
    // Historically the 1 value was for `Native` encapsulation (removed in v11)
    None = 2,
    ShadowDom = 3,
}

impl ViewEncapsulation {
    /// Looks up a member by the name it has on the runtime enum.
    pub fn from_symbol_name(name: &str) -> Option<Self> {
        match name {
            "Emulated" => Some(ViewEncapsulation::Emulated),
            "None" => Some(ViewEncapsulation::None),
            "ShadowDom" => Some(ViewEncapsulation::ShadowDom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChangeDetectionStrategy {
    OnPush = 0,
    Default = 1,
}

impl ChangeDetectionStrategy {
    pub fn from_symbol_name(name: &str) -> Option<Self> {
        match name {
            "OnPush" => Some(ChangeDetectionStrategy::OnPush),
            "Default" => Some(ChangeDetectionStrategy::Default),
            _ => None,
        }
    }
}

/// Injection flags for DI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum InjectFlags {
    Default = 0,
    Host = 1,
    Self_ = 2,
    SkipSelf = 4,
    Optional = 8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorFlags {
    NOT = 0b0001,
    ATTRIBUTE = 0b0010,
    ELEMENT = 0b0100,
    CLASS = 0b1000,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeMarker {
    NamespaceURI = 0,
    Classes = 1,
    Styles = 2,
    Bindings = 3,
    Template = 4,
    ProjectAs = 5,
    I18n = 6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderFlags {
    Create = 0b01,
    Update = 0b10,
}

/// One entry of a runtime selector: either a name/value string or a `SelectorFlags` mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum R3SelectorPart {
    Text(String),
    Flags(u32),
}

pub type R3CssSelector = Vec<R3SelectorPart>;
pub type R3CssSelectorList = Vec<R3CssSelector>;

fn text_parts(values: &[String]) -> impl Iterator<Item = R3SelectorPart> + '_ {
    values.iter().map(|v| R3SelectorPart::Text(v.clone()))
}

fn class_parts(selector: &CssSelector) -> Vec<R3SelectorPart> {
    if selector.class_names.is_empty() {
        return vec![];
    }
    let mut parts = vec![R3SelectorPart::Flags(SelectorFlags::CLASS as u32)];
    parts.extend(text_parts(&selector.class_names));
    parts
}

fn parser_selector_to_simple_selector(selector: &CssSelector) -> R3CssSelector {
    let element_name = match selector.element.as_deref() {
        Some(element) if element != "*" => element.to_string(),
        _ => String::new(),
    };
    let mut parts = vec![R3SelectorPart::Text(element_name)];
    parts.extend(text_parts(&selector.attrs));
    parts.extend(class_parts(selector));
    parts
}

fn parser_selector_to_negative_selector(selector: &CssSelector) -> R3CssSelector {
    if let Some(element) = &selector.element {
        let mut parts = vec![
            R3SelectorPart::Flags(SelectorFlags::NOT as u32 | SelectorFlags::ELEMENT as u32),
            R3SelectorPart::Text(element.clone()),
        ];
        parts.extend(text_parts(&selector.attrs));
        parts.extend(class_parts(selector));
        parts
    } else if !selector.attrs.is_empty() {
        let mut parts = vec![R3SelectorPart::Flags(
            SelectorFlags::NOT as u32 | SelectorFlags::ATTRIBUTE as u32,
        )];
        parts.extend(text_parts(&selector.attrs));
        parts.extend(class_parts(selector));
        parts
    } else if !selector.class_names.is_empty() {
        let mut parts = vec![R3SelectorPart::Flags(
            SelectorFlags::NOT as u32 | SelectorFlags::CLASS as u32,
        )];
        parts.extend(text_parts(&selector.class_names));
        parts
    } else {
        vec![]
    }
}

fn parser_selector_to_r3_selector(selector: &CssSelector) -> R3CssSelector {
    let mut positive = parser_selector_to_simple_selector(selector);
    for not_selector in &selector.not_selectors {
        positive.extend(parser_selector_to_negative_selector(not_selector));
    }
    positive
}

/// Converts a CSS selector string into the runtime's selector list.
///
/// A missing or empty selector yields an empty list.
pub fn parse_selector_to_r3_selector(selector: Option<&str>) -> Result<R3CssSelectorList, String> {
    match selector {
        Some(selector) if !selector.is_empty() => Ok(CssSelector::parse(selector)?
            .iter()
            .map(parser_selector_to_r3_selector)
            .collect()),
        _ => Ok(vec![]),
    }
}
