use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::models::{CompleteRecord, LtlFormula, Property, Proposition};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

/// The four persisted tables. Each lives in its own file under the
/// store's data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Properties,
    Propositions,
    Formulas,
    Complete,
}

impl Table {
    pub fn parse(name: &str) -> Result<Self, StoreError> {
        match name.to_lowercase().as_str() {
            "properties" => Ok(Table::Properties),
            "propositions" => Ok(Table::Propositions),
            "formulas" | "ltl" => Ok(Table::Formulas),
            "complete" => Ok(Table::Complete),
            other => Err(StoreError::UnknownTable(other.to_string())),
        }
    }

    fn file_name(&self) -> &'static str {
        match self {
            Table::Properties => "properties.json",
            Table::Propositions => "propositions.json",
            Table::Formulas => "ltl_formulas.json",
            Table::Complete => "complete_formalization.json",
        }
    }
}

/// Persisted record kinds expose their primary key for upsert.
trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Property {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Proposition {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for LtlFormula {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Flat-file table store with upsert-by-id semantics: a saved record
/// whose id matches an existing row replaces that row in place, a
/// fresh id appends, and every other row is untouched. Last write
/// wins. The store is shared across runs with no locking.
pub struct DataStore {
    data_dir: PathBuf,
}

impl DataStore {
    /// Creates a store rooted at the given directory, creating it if
    /// needed.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
        }
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn table_path(&self, table: Table) -> PathBuf {
        self.data_dir.join(table.file_name())
    }

    fn load<T: DeserializeOwned>(&self, table: Table) -> Result<Vec<T>, StoreError> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save<T: Serialize>(&self, table: Table, rows: &[T]) -> Result<(), StoreError> {
        let path = self.table_path(table);
        let contents = serde_json::to_string_pretty(rows)?;
        fs::write(&path, contents)?;
        debug!("Saved {} rows to {}", rows.len(), path.display());
        Ok(())
    }

    fn upsert<T>(&self, table: Table, records: &[T]) -> Result<(), StoreError>
    where
        T: Keyed + Serialize + DeserializeOwned + Clone,
    {
        let mut rows: Vec<T> = self.load(table)?;
        for record in records {
            match rows.iter().position(|row| row.key() == record.key()) {
                Some(idx) => rows[idx] = record.clone(),
                None => rows.push(record.clone()),
            }
        }
        self.save(table, &rows)
    }

    pub fn load_properties(&self) -> Result<Vec<Property>, StoreError> {
        self.load(Table::Properties)
    }

    pub fn load_propositions(&self) -> Result<Vec<Proposition>, StoreError> {
        self.load(Table::Propositions)
    }

    pub fn load_formulas(&self) -> Result<Vec<LtlFormula>, StoreError> {
        self.load(Table::Formulas)
    }

    pub fn upsert_properties(&self, records: &[Property]) -> Result<(), StoreError> {
        self.upsert(Table::Properties, records)
    }

    pub fn upsert_propositions(&self, records: &[Proposition]) -> Result<(), StoreError> {
        self.upsert(Table::Propositions, records)
    }

    pub fn upsert_formulas(&self, records: &[LtlFormula]) -> Result<(), StoreError> {
        self.upsert(Table::Formulas, records)
    }

    /// Mark the given propositions as approved by the named reviewer.
    pub fn approve_propositions(&self, ids: &[String], approver: &str) -> Result<(), StoreError> {
        let mut rows = self.load_propositions()?;
        for row in rows.iter_mut() {
            if ids.iter().any(|id| id == &row.id) {
                row.approved = true;
                row.approved_by = approver.to_string();
            }
        }
        self.save(Table::Propositions, &rows)
    }

    /// Mark the given formulas as approved by the named reviewer.
    pub fn approve_formulas(&self, ids: &[String], approver: &str) -> Result<(), StoreError> {
        let mut rows = self.load_formulas()?;
        for row in rows.iter_mut() {
            if ids.iter().any(|id| id == &row.id) {
                row.approved = true;
                row.approved_by = approver.to_string();
            }
        }
        self.save(Table::Formulas, &rows)
    }

    /// Recompute the joined complete-formalization table from the
    /// three durable tables, persist it, and return it. The join is
    /// cumulative over everything ever stored, not just the current
    /// session. Missing propositions or formulas join to empty fields
    /// and approved = false.
    pub fn complete_formalization(&self) -> Result<Vec<CompleteRecord>, StoreError> {
        let properties = self.load_properties()?;
        let propositions = self.load_propositions()?;
        let formulas = self.load_formulas()?;

        let mut records = Vec::with_capacity(properties.len());

        for property in &properties {
            let names: Vec<&str> = propositions
                .iter()
                .filter(|p| p.property_id == property.id)
                .map(|p| p.name.as_str())
                .collect();

            let formula = formulas.iter().find(|f| f.property_id == property.id);

            records.push(CompleteRecord {
                property_id: property.id.clone(),
                rfc_number: property.rfc.clone(),
                section: property.section.clone(),
                property_category: property.category.clone(),
                natural_language: property.text.clone(),
                atomic_propositions: names.join(", "),
                ltl_formula: formula.map(|f| f.formula.clone()).unwrap_or_default(),
                ltl_explanation: formula.map(|f| f.explanation.clone()).unwrap_or_default(),
                ltl_operators: formula.map(|f| f.operators_joined()).unwrap_or_default(),
                approved: formula.map(|f| f.approved).unwrap_or(false),
                timestamp: property.timestamp,
            });
        }

        self.save(Table::Complete, &records)?;
        info!("Materialized {} complete formalization records", records.len());

        Ok(records)
    }

    /// Render a table as delimited text (header row plus quoted
    /// fields), the export surface for downstream tooling.
    pub fn export_csv(&self, table: Table) -> Result<String, StoreError> {
        match table {
            Table::Properties => {
                let rows = self.load_properties()?;
                let mut out = csv_row(&["id", "rfc", "section", "text", "category", "timestamp"]);
                for r in &rows {
                    out.push_str(&csv_row(&[
                        &r.id,
                        &r.rfc,
                        &r.section,
                        &r.text,
                        &r.category.to_string(),
                        &r.timestamp.to_rfc3339(),
                    ]));
                }
                Ok(out)
            }
            Table::Propositions => {
                let rows = self.load_propositions()?;
                let mut out = csv_row(&[
                    "id",
                    "property_id",
                    "name",
                    "kind",
                    "description",
                    "timestamp",
                    "approved",
                    "approved_by",
                ]);
                for r in &rows {
                    out.push_str(&csv_row(&[
                        &r.id,
                        &r.property_id,
                        &r.name,
                        &r.kind.to_string(),
                        &r.description,
                        &r.timestamp.to_rfc3339(),
                        &r.approved.to_string(),
                        &r.approved_by,
                    ]));
                }
                Ok(out)
            }
            Table::Formulas => {
                let rows = self.load_formulas()?;
                let mut out = csv_row(&[
                    "id",
                    "property_id",
                    "formula",
                    "explanation",
                    "operators_used",
                    "timestamp",
                    "approved",
                    "approved_by",
                ]);
                for r in &rows {
                    out.push_str(&csv_row(&[
                        &r.id,
                        &r.property_id,
                        &r.formula,
                        &r.explanation,
                        &r.operators_joined(),
                        &r.timestamp.to_rfc3339(),
                        &r.approved.to_string(),
                        &r.approved_by,
                    ]));
                }
                Ok(out)
            }
            Table::Complete => {
                let rows = self.complete_formalization()?;
                let mut out = csv_row(&[
                    "property_id",
                    "rfc_number",
                    "section",
                    "property_category",
                    "natural_language",
                    "atomic_propositions",
                    "ltl_formula",
                    "ltl_explanation",
                    "ltl_operators",
                    "approved",
                    "timestamp",
                ]);
                for r in &rows {
                    out.push_str(&csv_row(&[
                        &r.property_id,
                        &r.rfc_number,
                        &r.section,
                        &r.property_category.to_string(),
                        &r.natural_language,
                        &r.atomic_propositions,
                        &r.ltl_formula,
                        &r.ltl_explanation,
                        &r.ltl_operators,
                        &r.approved.to_string(),
                        &r.timestamp.to_rfc3339(),
                    ]));
                }
                Ok(out)
            }
        }
    }
}

fn csv_row(fields: &[&str]) -> String {
    let mut row = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}

fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::{PropertyCategory, PropositionKind};
    use chrono::Utc;
    use tempfile::TempDir;

    fn property(id: &str, text: &str) -> Property {
        Property {
            id: id.to_string(),
            rfc: "8446".to_string(),
            section: "4.1".to_string(),
            text: text.to_string(),
            category: PropertyCategory::Safety,
            timestamp: Utc::now(),
        }
    }

    fn proposition(id: &str, property_id: &str, name: &str) -> Proposition {
        Proposition {
            id: id.to_string(),
            property_id: property_id.to_string(),
            name: name.to_string(),
            kind: PropositionKind::Action,
            description: "desc".to_string(),
            timestamp: Utc::now(),
            approved: false,
            approved_by: String::new(),
        }
    }

    fn formula(id: &str, property_id: &str) -> LtlFormula {
        LtlFormula {
            id: id.to_string(),
            property_id: property_id.to_string(),
            formula: "G (a -> b)".to_string(),
            explanation: "always".to_string(),
            operators_used: vec!["G".to_string(), "->".to_string()],
            timestamp: Utc::now(),
            approved: false,
            approved_by: String::new(),
        }
    }

    #[test]
    fn upsert_appends_new_ids() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new(dir.path()).unwrap();

        store.upsert_properties(&[property("a", "one")]).unwrap();
        store.upsert_properties(&[property("b", "two")]).unwrap();

        let rows = store.load_properties().unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn upsert_replaces_matching_id_and_leaves_others() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new(dir.path()).unwrap();

        store
            .upsert_properties(&[property("a", "one"), property("b", "two")])
            .unwrap();
        store.upsert_properties(&[property("a", "edited")]).unwrap();

        let rows = store.load_properties().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.iter().find(|r| r.id == "a").unwrap().text, "edited");
        assert_eq!(rows.iter().find(|r| r.id == "b").unwrap().text, "two");
    }

    #[test]
    fn approve_sets_flag_and_reviewer() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new(dir.path()).unwrap();

        store
            .upsert_propositions(&[proposition("p1", "a", "x"), proposition("p2", "a", "y")])
            .unwrap();
        store
            .approve_propositions(&["p1".to_string()], "alice")
            .unwrap();

        let rows = store.load_propositions().unwrap();
        let p1 = rows.iter().find(|r| r.id == "p1").unwrap();
        let p2 = rows.iter().find(|r| r.id == "p2").unwrap();
        assert!(p1.approved);
        assert_eq!(p1.approved_by, "alice");
        assert!(!p2.approved);
    }

    #[test]
    fn join_defaults_missing_fields() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new(dir.path()).unwrap();

        store.upsert_properties(&[property("a", "lonely")]).unwrap();

        let records = store.complete_formalization().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].atomic_propositions, "");
        assert_eq!(records[0].ltl_formula, "");
        assert!(!records[0].approved);
    }

    #[test]
    fn join_aggregates_propositions_and_first_formula() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new(dir.path()).unwrap();

        store.upsert_properties(&[property("a", "full")]).unwrap();
        store
            .upsert_propositions(&[proposition("p1", "a", "x"), proposition("p2", "a", "y")])
            .unwrap();
        store.upsert_formulas(&[formula("f1", "a")]).unwrap();

        let records = store.complete_formalization().unwrap();
        assert_eq!(records[0].atomic_propositions, "x, y");
        assert_eq!(records[0].ltl_formula, "G (a -> b)");
        assert_eq!(records[0].ltl_operators, "G,->");
    }

    #[test]
    fn export_quotes_fields_with_commas() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new(dir.path()).unwrap();

        store
            .upsert_properties(&[property("a", "client MUST, on close, flush")])
            .unwrap();

        let csv = store.export_csv(Table::Properties).unwrap();
        assert!(csv.starts_with("id,rfc,section,text,category,timestamp\n"));
        assert!(csv.contains("\"client MUST, on close, flush\""));
    }

    #[test]
    fn table_parse_rejects_unknown_names() {
        assert!(Table::parse("properties").is_ok());
        assert!(Table::parse("LTL").is_ok());
        assert!(Table::parse("nonsense").is_err());
    }
}
