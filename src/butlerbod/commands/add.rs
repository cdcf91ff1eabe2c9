use crate::collection::TableCollection;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{CollectionKind, ItemFields};
use crate::store::TableStore;

pub async fn run<S: TableStore>(
    collection: &TableCollection<S>,
    kind: CollectionKind,
    fields: ItemFields,
) -> Result<CmdResult> {
    let name = fields.name.clone();
    collection.add_item(fields).await?;

    let mut result = CmdResult::default().with_redirect(kind.redirect());
    result.add_message(CmdMessage::success(format!(
        "{} added: {}",
        kind.singular(),
        name
    )));
    Ok(result)
}
