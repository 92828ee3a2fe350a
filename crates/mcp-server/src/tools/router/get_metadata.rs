use spotlight_query::{MetadataEngine, MetadataItem};

use super::{ArgumentExtractor, PathValidator, ResultFormatter, ToolError, ToolResult, ToolRouter};

/// `get_metadata`: every attribute of one existing path, unpaginated
pub(super) fn run(router: &ToolRouter, args: &ArgumentExtractor<'_>) -> ToolResult<String> {
    let path = args.require_absolute_path("path")?;
    let resolved = PathValidator::resolve_absolute(&path)?;
    router.check_allowed(&resolved)?;

    let not_found = || ToolError::FileNotFound(path.display().to_string());
    if !resolved.exists() {
        return Err(not_found());
    }
    let engine: &dyn MetadataEngine = router.engine();
    let item: Box<dyn MetadataItem> = engine.item_at_path(&resolved).ok_or_else(not_found)?;
    Ok(ResultFormatter::format_attributes(&item.attributes()))
}
