// 📥 CSV Import - Bulk-load relationships by member name
//
// Expected columns (header row required): from,to,type
//
//   from,to,type
//   Ada,Byron,child
//   Byron,Annabella,spouse
//
// Members are matched by name (case-insensitive). Names that are not yet in
// the network are created on first use. The whole file is applied as one
// write: a bad row aborts the import and nothing is saved.

use crate::error::{FamilyError, Result};
use crate::member::MemberAttributes;
use crate::network::FamilyNetwork;
use crate::relationship::RelationshipType;
use crate::service::FamilyService;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipRow {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub relationship: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub rows: usize,
    pub members_created: usize,
    pub relationships_added: usize,
}

/// Parse every row up front so a malformed file fails before any write
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RelationshipRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        let row: RelationshipRow = record?;
        rows.push(row);
    }
    Ok(rows)
}

/// Resolve a name to a member id, creating the member when missing
fn member_id_for(
    network: &mut FamilyNetwork,
    name: &str,
    summary: &mut ImportSummary,
) -> Result<String> {
    if let Some(member) = network.graph.member_by_name(name) {
        return Ok(member.id.clone());
    }

    let member = network.add_member(MemberAttributes::named(name))?;
    summary.members_created += 1;
    Ok(member.id)
}

/// Apply parsed rows to a network in memory
pub fn apply_rows(network: &mut FamilyNetwork, rows: &[RelationshipRow]) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for (line, row) in rows.iter().enumerate() {
        if row.relationship.is_empty() {
            // +2: header row, 1-based lines
            return Err(FamilyError::InvalidInput(format!(
                "line {}: relationship type is empty",
                line + 2
            )));
        }

        let from = member_id_for(network, &row.from, &mut summary)?;
        let to = member_id_for(network, &row.to, &mut summary)?;
        network.add_relationship(&from, &to, RelationshipType::parse(&row.relationship))?;

        summary.rows += 1;
        summary.relationships_added += 1;
    }

    Ok(summary)
}

/// Import a CSV file into a stored network
pub fn import_relationships<R: Read>(
    service: &FamilyService,
    network_id: &str,
    reader: R,
) -> Result<ImportSummary> {
    let rows = read_rows(reader)?;
    let summary = service.apply(network_id, |network| apply_rows(network, &rows))?;

    info!(
        network_id,
        rows = summary.rows,
        members_created = summary.members_created,
        "imported relationships"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use std::sync::Arc;

    const CSV: &str = "from,to,type\n\
                       Ada,Byron,child\n\
                       Byron, Annabella ,spouse\n\
                       ada,Annabella,Child\n";

    #[test]
    fn test_read_rows_trims_fields() {
        let rows = read_rows(CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].to, "Annabella");
    }

    #[test]
    fn test_apply_rows_creates_missing_members_once() {
        let mut network = FamilyNetwork::new("Lovelace", "Ada", None).unwrap();
        let rows = read_rows(CSV.as_bytes()).unwrap();

        let summary = apply_rows(&mut network, &rows).unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                rows: 3,
                members_created: 2,
                relationships_added: 3,
            }
        );
        assert_eq!(network.member_count(), 3);

        let ada = network.find_member("Ada").unwrap().id.clone();
        let annabella = network.find_member("Annabella").unwrap().id.clone();
        assert_eq!(network.relationship_chain(&annabella, &ada).summary, "parent");
    }

    #[test]
    fn test_non_ascii_names_match_regardless_of_case() {
        let service = FamilyService::new(Arc::new(InMemoryStore::new()));
        let network = service.create_network("Zola", "Zoë", None).unwrap();
        let csv = "from,to,type\nZOË,Émile,parent\némile,zoë,child\n";

        let summary = import_relationships(&service, &network.id, csv.as_bytes()).unwrap();
        assert_eq!(summary.members_created, 1);
        assert_eq!(summary.relationships_added, 2);

        let stored = service.get_network(&network.id).unwrap();
        assert_eq!(stored.member_count(), 2);
        let zoe = stored.find_member("zoë").unwrap().id.clone();
        let emile = stored.find_member("ÉMILE").unwrap().id.clone();
        assert_eq!(
            stored.graph.relationship_between(&emile, &zoe),
            Some(&RelationshipType::Child)
        );
    }

    #[test]
    fn test_import_through_service() {
        let service = FamilyService::new(Arc::new(InMemoryStore::new()));
        let network = service.create_network("Lovelace", "Ada", None).unwrap();

        let summary = import_relationships(&service, &network.id, CSV.as_bytes()).unwrap();
        assert_eq!(summary.relationships_added, 3);

        let stored = service.get_network(&network.id).unwrap();
        assert_eq!(stored.graph.relationship_count(), 3);
    }

    #[test]
    fn test_bad_row_saves_nothing() {
        let service = FamilyService::new(Arc::new(InMemoryStore::new()));
        let network = service.create_network("Lovelace", "Ada", None).unwrap();
        let csv = "from,to,type\nAda,Byron,child\nAda,Byron,\n";

        let err = import_relationships(&service, &network.id, csv.as_bytes()).unwrap_err();
        assert!(matches!(err, FamilyError::InvalidInput(_)));
        assert_eq!(service.get_network(&network.id).unwrap().member_count(), 1);
    }

    #[test]
    fn test_missing_column_is_csv_error() {
        let err = read_rows("from,to\nAda,Byron\n".as_bytes()).unwrap_err();
        assert!(matches!(err, FamilyError::Csv(_)));
    }
}
