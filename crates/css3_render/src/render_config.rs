/// RenderConfig holds the configuration for the token serializer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Insert an empty comment between tokens that would otherwise merge when read back
    pub insert_comments: bool,
    /// Stop serializing at the first error token (error, bad string, bad url, bad escape)
    pub stop_on_error: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            insert_comments: true,
            stop_on_error: false,
        }
    }
}
