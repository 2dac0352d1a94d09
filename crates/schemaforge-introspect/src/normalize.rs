use std::collections::HashMap;

use schemaforge_core::{
    Configuration, Diagnostics, Error, RawColumn, Result, Schema, Table, sort_tables,
};

use crate::hooks::NormalizeHooks;
use crate::mapper::build_column;
use crate::options::{NormalizeOptions, TableFilter};

/// Keep columns whose table passes `include` and is not caught by `exclude`.
///
/// Exclusion is applied after inclusion. Patterns are compiled once; an
/// invalid pattern is a configuration error.
pub fn filter_columns(
    columns: Vec<RawColumn>,
    include: Option<&TableFilter>,
    exclude: Option<&TableFilter>,
) -> Result<Vec<RawColumn>> {
    let include = include.map(|filter| filter.compile("include")).transpose()?;
    let exclude = exclude.map(|filter| filter.compile("exclude")).transpose()?;

    Ok(columns
        .into_iter()
        .filter(|column| include.as_ref().is_none_or(|filter| filter.matches(&column.table)))
        .filter(|column| !exclude.as_ref().is_some_and(|filter| filter.matches(&column.table)))
        .collect())
}

/// Group raw columns into tables, keeping first-seen table and column order.
///
/// The table kind is taken from the first column seen for that table.
pub fn group_into_tables(
    columns: Vec<RawColumn>,
    schema_name: &str,
    config: &Configuration,
    diagnostics: &dyn Diagnostics,
) -> Vec<Table> {
    let mut tables: Vec<Table> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for raw in columns {
        let schema = raw.schema.clone().unwrap_or_else(|| schema_name.to_string());
        let column = build_column(&raw, config, diagnostics);
        let slot = *index
            .entry((schema.clone(), raw.table.clone()))
            .or_insert_with(|| {
                tables.push(Table {
                    name: raw.table.clone(),
                    schema,
                    kind: raw.table_kind,
                    columns: Vec::new(),
                });
                tables.len() - 1
            });
        tables[slot].columns.push(column);
    }

    tables
}

/// Turn collector output into a sorted [`Schema`].
///
/// Column hooks run once per column in source order, then the table hook
/// runs once for its table. Hook errors are returned unmodified.
pub async fn normalize(
    raw: Vec<RawColumn>,
    options: &NormalizeOptions,
    config: &Configuration,
    hooks: Option<&dyn NormalizeHooks>,
    diagnostics: &dyn Diagnostics,
) -> Result<Schema> {
    if options.schema_name.trim().is_empty() {
        return Err(Error::Configuration(
            "schema name must not be empty".to_string(),
        ));
    }

    let total = raw.len();
    let kept = filter_columns(raw, options.include.as_ref(), options.exclude.as_ref())?;
    if kept.len() < total {
        diagnostics.debug(
            "columns_filtered",
            &format!("kept {} of {} columns", kept.len(), total),
        );
    }

    let grouped = group_into_tables(kept, &options.schema_name, config, diagnostics);

    let mut tables = Vec::with_capacity(grouped.len());
    for mut table in grouped {
        if let Some(hooks) = hooks {
            let mut columns = Vec::with_capacity(table.columns.len());
            for column in std::mem::take(&mut table.columns) {
                columns.push(hooks.on_column_created(&table.name, column).await?);
            }
            table.columns = columns;
            table = hooks.on_table_created(table).await?;
        }
        tables.push(table);
    }

    sort_tables(&mut tables);
    diagnostics.info(
        "schema_normalized",
        &format!(
            "schema '{}' normalized with {} table(s)",
            options.schema_name,
            tables.len()
        ),
    );

    Ok(Schema {
        name: options.schema_name.clone(),
        tables,
    })
}

#[cfg(test)]
mod tests {
    use schemaforge_core::{NoopDiagnostics, TableKind};

    use super::*;

    fn raw(table: &str, name: &str) -> RawColumn {
        RawColumn {
            table: table.to_string(),
            name: name.to_string(),
            data_type: "text".to_string(),
            is_nullable: false,
            default_value: None,
            max_length: None,
            description: None,
            check_constraints: Vec::new(),
            table_kind: TableKind::Table,
            is_identity: false,
            schema: None,
        }
    }

    #[test]
    fn exclude_wins_over_include() {
        let columns = vec![raw("users", "id"), raw("user_audit", "id"), raw("orders", "id")];
        let include = TableFilter::Pattern("^user".to_string());
        let exclude = TableFilter::Names(vec!["user_audit".to_string()]);

        let kept = filter_columns(columns, Some(&include), Some(&exclude)).expect("filter");
        let tables: Vec<&str> = kept.iter().map(|column| column.table.as_str()).collect();
        assert_eq!(tables, vec!["users"]);
    }

    #[test]
    fn invalid_pattern_is_configuration_error() {
        let include = TableFilter::Pattern("([".to_string());
        let err = filter_columns(vec![raw("users", "id")], Some(&include), None)
            .expect_err("invalid regex");
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn groups_preserve_column_order() {
        let columns = vec![
            raw("users", "id"),
            raw("orders", "id"),
            raw("users", "email"),
            raw("users", "name"),
        ];
        let tables = group_into_tables(columns, "public", &Configuration::default(), &NoopDiagnostics);

        assert_eq!(tables.len(), 2);
        let names: Vec<&str> = tables[0].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email", "name"]);
        assert_eq!(tables[0].schema, "public");
    }
}
