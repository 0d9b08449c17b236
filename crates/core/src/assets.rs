//! Static asset URLs

/// Folder on the static file server.
///
/// Names must match the server's layout exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFolder {
    /// Product images
    Products,

    /// Team member photos
    Team,

    /// Testimonial photos
    Testimonials,

    /// Award images
    Awards,

    /// Certificate scans
    Certificates,

    /// Dealer registration documents
    Dealers,

    /// Blog images
    Blogs,

    /// Article images
    Articles,
}

impl AssetFolder {
    /// Folder name on the server.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AssetFolder::Products => "products",
            AssetFolder::Team => "team",
            AssetFolder::Testimonials => "testimonials",
            AssetFolder::Awards => "awards",
            AssetFolder::Certificates => "certificates",
            AssetFolder::Dealers => "dealers",
            AssetFolder::Blogs => "blogs",
            AssetFolder::Articles => "articles",
        }
    }
}

/// `<base>/<folder>/<file>`, with exactly one slash at each join.
pub fn asset_url(base: &str, folder: AssetFolder, file_name: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        folder.as_str(),
        file_name.trim_start_matches('/')
    )
}
