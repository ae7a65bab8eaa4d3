//! HTML errors

use umbra_dom::DomError;

/// Errors from parsing markup into the tree
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    /// Reading the input failed
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    /// The tree rejected an operation (shadow attachment, insertion)
    #[error(transparent)]
    Dom(#[from] DomError),
}
