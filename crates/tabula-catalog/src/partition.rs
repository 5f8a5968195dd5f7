// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Partitioning: persisted descriptors, decoding against a schema, and
//! human-readable rendering of partition bounds.

use crate::error::CatalogError;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};

/// One hash dimension as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDimensionDescriptor {
    pub columns: Vec<String>,
    pub num_buckets: u32,
    #[serde(default)]
    pub seed: u32,
}

/// Table partitioning as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSchemaDescriptor {
    #[serde(default)]
    pub hash_dimensions: Vec<HashDimensionDescriptor>,
    #[serde(default)]
    pub range_columns: Vec<String>,
}

/// Tablet partition as persisted: one bucket per hash dimension and
/// optional range bound tuples (empty means unbounded).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionDescriptor {
    #[serde(default)]
    pub hash_buckets: Vec<u32>,
    #[serde(default)]
    pub range_lower: Vec<String>,
    #[serde(default)]
    pub range_upper: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HashDimension {
    columns: Vec<usize>,
    num_buckets: u32,
    seed: u32,
}

/// Partition schema resolved against a table schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSchema {
    hash_dimensions: Vec<HashDimension>,
    range_columns: Vec<usize>,
}

/// Validated tablet partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    hash_buckets: Vec<u32>,
    range_lower: Vec<String>,
    range_upper: Vec<String>,
}

fn resolve_columns(names: &[String], schema: &Schema) -> Result<Vec<usize>, CatalogError> {
    names
        .iter()
        .map(|name| {
            schema.find_column(name).ok_or_else(|| {
                CatalogError::Decode(format!("partition column '{}' not found in schema", name))
            })
        })
        .collect()
}

impl PartitionSchema {
    /// Resolve a persisted partition schema against `schema`.
    pub fn decode(desc: &PartitionSchemaDescriptor, schema: &Schema) -> Result<Self, CatalogError> {
        let mut hash_dimensions = Vec::with_capacity(desc.hash_dimensions.len());
        for dim in &desc.hash_dimensions {
            if dim.columns.is_empty() {
                return Err(CatalogError::Decode(
                    "hash dimension has no columns".into(),
                ));
            }
            if dim.num_buckets < 2 {
                return Err(CatalogError::Decode(format!(
                    "hash dimension must have at least 2 buckets, got {}",
                    dim.num_buckets
                )));
            }
            hash_dimensions.push(HashDimension {
                columns: resolve_columns(&dim.columns, schema)?,
                num_buckets: dim.num_buckets,
                seed: dim.seed,
            });
        }

        Ok(Self {
            hash_dimensions,
            range_columns: resolve_columns(&desc.range_columns, schema)?,
        })
    }

    /// Validate a tablet's persisted partition against this partition schema.
    pub fn decode_partition(
        &self,
        desc: &PartitionDescriptor,
        schema: &Schema,
    ) -> Result<Partition, CatalogError> {
        if desc.hash_buckets.len() != self.hash_dimensions.len() {
            return Err(CatalogError::Decode(format!(
                "partition has {} hash buckets, schema has {} hash dimensions",
                desc.hash_buckets.len(),
                self.hash_dimensions.len()
            )));
        }
        for (bucket, dim) in desc.hash_buckets.iter().zip(&self.hash_dimensions) {
            if *bucket >= dim.num_buckets {
                return Err(CatalogError::Decode(format!(
                    "hash bucket {} out of range (0..{})",
                    bucket, dim.num_buckets
                )));
            }
        }
        self.check_bound(&desc.range_lower, schema)?;
        self.check_bound(&desc.range_upper, schema)?;

        Ok(Partition {
            hash_buckets: desc.hash_buckets.clone(),
            range_lower: desc.range_lower.clone(),
            range_upper: desc.range_upper.clone(),
        })
    }

    fn check_bound(&self, bound: &[String], schema: &Schema) -> Result<(), CatalogError> {
        if bound.is_empty() {
            return Ok(());
        }
        if bound.len() != self.range_columns.len() {
            return Err(CatalogError::Decode(format!(
                "range bound has {} values, expected {}",
                bound.len(),
                self.range_columns.len()
            )));
        }
        for (value, idx) in bound.iter().zip(&self.range_columns) {
            let col = schema.column(*idx);
            if col.data_type.is_integer() && value.parse::<i64>().is_err() {
                return Err(CatalogError::Decode(format!(
                    "invalid {} value '{}' for column '{}'",
                    col.data_type.name(),
                    value,
                    col.name
                )));
            }
        }
        Ok(())
    }

    fn column_list(columns: &[usize], schema: &Schema) -> String {
        columns
            .iter()
            .map(|idx| schema.column(*idx).name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn bound_tuple(&self, values: &[String], schema: &Schema) -> String {
        let rendered: Vec<String> = values
            .iter()
            .zip(&self.range_columns)
            .map(|(value, idx)| {
                if schema.column(*idx).data_type.is_quoted() {
                    format!("{:?}", value)
                } else {
                    value.clone()
                }
            })
            .collect();
        if rendered.len() == 1 {
            rendered.join("")
        } else {
            format!("({})", rendered.join(", "))
        }
    }

    /// Human-readable description of one tablet's partition.
    ///
    /// `HASH (id) PARTITION 2, RANGE (ts) PARTITION 10 <= VALUES < 20`
    pub fn partition_debug_string(&self, partition: &Partition, schema: &Schema) -> String {
        let mut components = Vec::new();
        for (dim, bucket) in self.hash_dimensions.iter().zip(&partition.hash_buckets) {
            components.push(format!(
                "HASH ({}) PARTITION {}",
                Self::column_list(&dim.columns, schema),
                bucket
            ));
        }

        if !self.range_columns.is_empty() {
            let lower = &partition.range_lower;
            let upper = &partition.range_upper;
            let bounds = match (lower.is_empty(), upper.is_empty()) {
                (true, true) => "UNBOUNDED".to_string(),
                (false, true) => format!("{} <= VALUES", self.bound_tuple(lower, schema)),
                (true, false) => format!("VALUES < {}", self.bound_tuple(upper, schema)),
                (false, false) => format!(
                    "{} <= VALUES < {}",
                    self.bound_tuple(lower, schema),
                    self.bound_tuple(upper, schema)
                ),
            };
            components.push(format!(
                "RANGE ({}) PARTITION {}",
                Self::column_list(&self.range_columns, schema),
                bounds
            ));
        }

        if components.is_empty() {
            "UNBOUNDED".to_string()
        } else {
            components.join(", ")
        }
    }

    /// Table-level description, one clause per line.
    pub fn display_string(&self, schema: &Schema) -> String {
        let mut lines = Vec::new();
        for dim in &self.hash_dimensions {
            let mut line = format!(
                "HASH ({}) PARTITIONS {}",
                Self::column_list(&dim.columns, schema),
                dim.num_buckets
            );
            if dim.seed != 0 {
                line.push_str(&format!(" SEED {}", dim.seed));
            }
            line.push(',');
            lines.push(line);
        }
        lines.push(format!(
            "RANGE ({})",
            Self::column_list(&self.range_columns, schema)
        ));
        lines.join("\n")
    }
}
