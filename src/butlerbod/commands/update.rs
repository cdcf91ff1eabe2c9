use crate::collection::TableCollection;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{CollectionKind, ItemFields};
use crate::store::TableStore;

pub async fn run<S: TableStore>(
    collection: &TableCollection<S>,
    kind: CollectionKind,
    row_key: &str,
    fields: ItemFields,
) -> Result<CmdResult> {
    let name = fields.name.clone();
    collection.update_item(row_key, fields).await?;

    let mut result = CmdResult::default().with_redirect(kind.redirect());
    result.add_message(CmdMessage::success(format!(
        "{} updated ({}): {}",
        kind.singular(),
        row_key,
        name
    )));
    Ok(result)
}
