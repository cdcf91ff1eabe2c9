use crate::collection::TableCollection;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::CollectionKind;
use crate::store::TableStore;

pub async fn run<S: TableStore>(
    collection: &TableCollection<S>,
    kind: CollectionKind,
    row_key: &str,
) -> Result<CmdResult> {
    let item = collection.get_item(row_key).await?;
    Ok(CmdResult::default()
        .with_title(kind.singular())
        .with_listed_items(vec![item]))
}
