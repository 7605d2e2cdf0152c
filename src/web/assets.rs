//! Gallery page and the static files it references, compiled into the binary.

pub const INDEX_HTML: &str = include_str!("assets/index.html");

pub struct StaticAsset {
    pub content_type: &'static str,
    pub body: &'static str,
}

static STATIC_ASSETS: [(&str, StaticAsset); 2] = [
    (
        "styles.css",
        StaticAsset {
            content_type: "text/css; charset=utf-8",
            body: include_str!("assets/styles.css"),
        },
    ),
    (
        "app.js",
        StaticAsset {
            content_type: "application/javascript; charset=utf-8",
            body: include_str!("assets/app.js"),
        },
    ),
];

/// Files served under `/static/`.
pub fn lookup(name: &str) -> Option<&'static StaticAsset> {
    STATIC_ASSETS
        .iter()
        .find(|(asset_name, _)| *asset_name == name)
        .map(|(_, asset)| asset)
}
