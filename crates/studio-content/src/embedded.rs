//! Embedded YAML catalogs so a studio can start without any files on disk.
//! Provides stable names looked up by `get_yaml(name)`.

/// Catalog files, in load order.
pub const CATALOGS: [&str; 5] = ["crises", "decisions", "scripts", "roster", "partners"];

#[inline]
pub fn get_yaml(name: &str) -> Option<&'static str> {
    let text = match name {
        "crises" => include_str!("../../../assets/content/crises.yaml"),
        "decisions" => include_str!("../../../assets/content/decisions.yaml"),
        "scripts" => include_str!("../../../assets/content/scripts.yaml"),
        "roster" => include_str!("../../../assets/content/roster.yaml"),
        "partners" => include_str!("../../../assets/content/partners.yaml"),
        _ => return None,
    };
    Some(text)
}
