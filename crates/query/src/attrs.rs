//! Well-known metadata attribute names.

pub const PATH: &str = "kMDItemPath";
pub const FS_NAME: &str = "kMDItemFSName";
pub const DISPLAY_NAME: &str = "kMDItemDisplayName";
pub const FS_SIZE: &str = "kMDItemFSSize";
pub const CONTENT_TYPE: &str = "kMDItemContentType";
pub const CONTENT_TYPE_TREE: &str = "kMDItemContentTypeTree";
pub const CONTENT_CREATION_DATE: &str = "kMDItemContentCreationDate";
pub const CONTENT_MODIFICATION_DATE: &str = "kMDItemContentModificationDate";
pub const FS_CREATION_DATE: &str = "kMDItemFSCreationDate";
pub const FS_CONTENT_CHANGE_DATE: &str = "kMDItemFSContentChangeDate";
pub const TEXT_CONTENT: &str = "kMDItemTextContent";
