use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\?").ok());

/// Collapses whitespace and rewrites `?` placeholders to Postgres `$n`.
pub fn sql(query: &str) -> String {
    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let Some(re) = PLACEHOLDER.as_ref() else {
        return cleaned;
    };

    let mut param_index = 0;
    re.replace_all(&cleaned, |_: &Captures| {
        param_index += 1;
        format!("${}", param_index)
    })
    .into_owned()
}
