//! Common fixtures for style generation tests.

/// Two-color red to green ramp.
pub const RED_GREEN: &[&str] = &["#ff0000", "#00ff00"];

/// Three-stop blue, white, red diverging ramp.
pub const BLUE_WHITE_RED: &[&str] = &["#0000ff", "#ffffff", "#ff0000"];

/// Explicit value to color table for three integer classes.
pub const GREY_LEVELS: &[(&str, &str)] = &[("1", "#aaaaaa"), ("2", "#bbbbbb"), ("3", "#cccccc")];

/// Land-use categories as they might come out of a text column.
pub const LAND_USE: &[&str] = &["residential", "forest", "water", "agriculture"];

/// Owned copies of a string slice fixture.
pub fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Owned copies of a pair fixture.
pub fn owned_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
