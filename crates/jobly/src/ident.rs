//! Quoted SQL identifiers.
//!
//! Postgres cannot bind identifiers as parameters, so column names that end up
//! in generated SQL go through [`Ident`], which always renders them
//! double-quoted (`"company_handle"`) with embedded quotes doubled. A column
//! called `"order"` or `"user"` therefore never collides with a keyword.

use crate::error::{JoblyError, JoblyResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    name: String,
}

impl Ident {
    /// A column identifier. Empty names and names containing NUL are rejected.
    pub fn new(name: &str) -> JoblyResult<Self> {
        if name.is_empty() {
            return Err(JoblyError::invalid_sql("identifier cannot be empty"));
        }
        if name.contains('\0') {
            return Err(JoblyError::invalid_sql(
                "identifier cannot contain NUL character",
            ));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 2);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push('"');
        for ch in self.name.chars() {
            if ch == '"' {
                out.push('"');
            }
            out.push(ch);
        }
        out.push('"');
    }
}
