use schemaforge_core::{Column, Configuration, Diagnostics, Result, Table};

use crate::hooks::RenderHooks;
use crate::model::{ColumnRenderModel, EnumDefinition, JsonSchemaImport, TableRenderModel};
use crate::naming::{column_identifiers, enum_type_name, property_name, table_identifiers};
use crate::renderer::{ColumnIdentifiers, RenderMode, render};

/// Build the render model of one column, before hooks.
pub fn build_column_model(table: &Table, column: &Column, config: &Configuration) -> ColumnRenderModel {
    let identifiers = column_identifiers(table, column, config);
    ColumnRenderModel {
        column: column.clone(),
        property_name: property_name(column, config),
        read_expression: render(column, config, &identifiers, RenderMode::Read),
        write_expression: render(column, config, &identifiers, RenderMode::Write),
        enum_type_name: column
            .is_enum
            .then(|| enum_type_name(&table.name, &column.name, config)),
        enum_name: identifiers.enum_constant,
        json_schema_name: identifiers.json_schema,
    }
}

/// Build the render model of one table.
///
/// Columns are processed in order. The column hook runs once per column;
/// each expression it did not change is rendered again from the column it
/// returned. The table hook runs once, last.
pub async fn build_table_model(
    table: &Table,
    config: &Configuration,
    hooks: Option<&dyn RenderHooks>,
    diagnostics: &dyn Diagnostics,
) -> Result<TableRenderModel> {
    let mut columns = Vec::with_capacity(table.columns.len());
    for column in &table.columns {
        let mut model = build_column_model(table, column, config);
        if let Some(hooks) = hooks {
            let read_before = model.read_expression.clone();
            let write_before = model.write_expression.clone();
            model = hooks.on_column_model_created(&table.name, model).await?;
            rerender_untouched(&mut model, config, &read_before, &write_before);
        }
        columns.push(model);
    }

    let write_columns: Vec<ColumnRenderModel> = columns
        .iter()
        .filter(|model| model.column.is_writable)
        .cloned()
        .collect();

    let mut enums: Vec<EnumDefinition> = Vec::new();
    let mut json_imports: Vec<JsonSchemaImport> = Vec::new();
    for model in &columns {
        if model.column.is_enum
            && let Some(constant_name) = &model.enum_name
            && !enums.iter().any(|existing| &existing.constant_name == constant_name)
        {
            enums.push(EnumDefinition {
                constant_name: constant_name.clone(),
                type_name: model
                    .enum_type_name
                    .clone()
                    .unwrap_or_else(|| enum_type_name(&table.name, &model.column.name, config)),
                values: model.column.enum_values.clone(),
            });
        }
        if let (Some(name), Some(location)) =
            (&model.json_schema_name, &config.json_schema_import_location)
            && !json_imports.iter().any(|existing| &existing.name == name)
        {
            json_imports.push(JsonSchemaImport {
                name: name.clone(),
                location: location.clone(),
            });
        }
    }

    let mut model = TableRenderModel {
        name: table.name.clone(),
        schema: table.schema.clone(),
        kind: table.kind,
        identifiers: table_identifiers(table, config),
        columns,
        write_columns,
        enums,
        json_imports,
    };
    if let Some(hooks) = hooks {
        model = hooks.on_table_model_created(model).await?;
    }

    diagnostics.debug(
        "table_model_built",
        &format!(
            "{}.{}: {} column(s), {} writable, {} enum(s)",
            model.schema,
            model.name,
            model.columns.len(),
            model.write_columns.len(),
            model.enums.len()
        ),
    );
    Ok(model)
}

fn rerender_untouched(
    model: &mut ColumnRenderModel,
    config: &Configuration,
    read_before: &str,
    write_before: &str,
) {
    let identifiers = ColumnIdentifiers {
        enum_constant: model.enum_name.clone(),
        json_schema: model.json_schema_name.clone(),
    };
    if model.read_expression == read_before {
        model.read_expression = render(&model.column, config, &identifiers, RenderMode::Read);
    }
    if model.write_expression == write_before {
        model.write_expression = render(&model.column, config, &identifiers, RenderMode::Write);
    }
}
