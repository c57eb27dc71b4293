/// One piece of a [`Sql`](super::Sql) statement.
#[derive(Debug, Clone)]
pub(super) enum SqlPart {
    Raw(String),
    /// A placeholder; its number is assigned when the statement is rendered.
    Param,
}
