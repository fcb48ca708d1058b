use serde::{Deserialize, Serialize};

use crate::ids::string_id;

string_id!(RouteID);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub route_id: RouteID,
    #[serde(rename = "route_short_name", default)]
    pub short_name: Option<String>,
    #[serde(rename = "route_long_name", default)]
    pub long_name: Option<String>,
    #[serde(rename = "route_color", default)]
    pub color: Option<RouteColor>,
}

/// A hex color like `1A2B3C`, stored without the leading `#`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RouteColor(String);

impl Route {
    pub fn describe(&self) -> String {
        self.short_name
            .iter()
            .chain(self.long_name.iter())
            .find(|x| !x.is_empty())
            .cloned()
            .unwrap_or_else(|| self.route_id.to_string())
    }

    /// What markers and polylines for this route get painted with
    pub fn css_color(&self) -> String {
        css_color(self.color.as_ref())
    }
}

impl RouteColor {
    pub fn new<S: Into<String>>(hex: S) -> Self {
        let hex = hex.into();
        // Some feeds include the # anyway
        match hex.strip_prefix('#') {
            Some(x) => Self(x.to_string()),
            None => Self(hex),
        }
    }

    pub fn hex(&self) -> &str {
        &self.0
    }

    pub fn css(&self) -> String {
        format!("#{}", self.0)
    }
}

impl From<String> for RouteColor {
    fn from(x: String) -> Self {
        Self::new(x)
    }
}

impl From<RouteColor> for String {
    fn from(x: RouteColor) -> Self {
        x.0
    }
}

/// Falls back to black when there's no color, or it's blank
pub fn css_color(color: Option<&RouteColor>) -> String {
    match color {
        Some(c) if !c.hex().is_empty() => c.css(),
        _ => "black".to_string(),
    }
}
