// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Table schema: persisted descriptor and its validated form.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Column data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Int8,
    Int16,
    Int32,
    Int64,
    UnixtimeMicros,
    Float,
    Double,
    Bool,
    String,
    Binary,
}

impl DataType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::UnixtimeMicros => "UNIXTIME_MICROS",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Bool => "BOOL",
            Self::String => "STRING",
            Self::Binary => "BINARY",
        }
    }

    /// SQL type used in external table definitions.
    pub fn sql_name(self) -> &'static str {
        match self {
            Self::Int8 => "TINYINT",
            Self::Int16 => "SMALLINT",
            Self::Int32 => "INT",
            Self::Int64 => "BIGINT",
            Self::UnixtimeMicros => "TIMESTAMP",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Bool => "BOOLEAN",
            Self::String => "STRING",
            Self::Binary => "BINARY",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 | Self::UnixtimeMicros
        )
    }

    /// Whether literal values of this type are rendered quoted.
    pub fn is_quoted(self) -> bool {
        matches!(self, Self::String | Self::Binary)
    }
}

/// A single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub id: u32,
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub is_key: bool,
}

impl ColumnSchema {
    pub fn new(id: u32, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id,
            name: name.into(),
            data_type,
            nullable: false,
            is_key: false,
        }
    }

    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Type with nullability suffix (`INT64 NOT NULL`).
    pub fn type_string(&self) -> String {
        if self.nullable {
            format!("{} NULLABLE", self.data_type.name())
        } else {
            format!("{} NOT NULL", self.data_type.name())
        }
    }
}

/// Schema as persisted with the table entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    #[serde(default)]
    pub columns: Vec<ColumnSchema>,
}

/// Validated schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
}

impl Schema {
    /// Decode and validate a persisted schema descriptor.
    pub fn decode(desc: &SchemaDescriptor) -> Result<Self, CatalogError> {
        if desc.columns.is_empty() {
            return Err(CatalogError::Decode("schema has no columns".into()));
        }
        let mut names = HashSet::new();
        for col in &desc.columns {
            if !names.insert(col.name.as_str()) {
                return Err(CatalogError::Decode(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
            if col.is_key && col.nullable {
                return Err(CatalogError::Decode(format!(
                    "key column '{}' cannot be nullable",
                    col.name
                )));
            }
        }
        if !desc.columns.iter().any(|c| c.is_key) {
            return Err(CatalogError::Decode("schema has no key columns".into()));
        }
        Ok(Self {
            columns: desc.columns.clone(),
        })
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn column(&self, idx: usize) -> &ColumnSchema {
        &self.columns[idx]
    }

    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn key_columns(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(|c| c.is_key)
    }
}
