use crate::{CertificateRecord, CertificateStatus, RecordStatus, StudentSummary, id_text};
use serde::Deserialize;

/// Status selector of the certificate dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Revoked,
}

impl StatusFilter {
    /// Statuses this client does not know only match `All`
    pub fn matches(&self, status: &RecordStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status.is(CertificateStatus::Active),
            StatusFilter::Revoked => status.is(CertificateStatus::Revoked),
        }
    }
}

/// Text and status filter over issued certificates
#[derive(Debug, Clone, Default)]
pub struct CertificateFilter {
    pub query: String,
    pub status: StatusFilter,
}

impl CertificateFilter {
    pub fn new(query: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            query: query.into(),
            status,
        }
    }

    /// Certificates matching both the status and the query
    ///
    /// The query is matched case-insensitively as a substring of the
    /// student name, course name, certificate ID and skills.
    pub fn apply<'a>(&self, records: &'a [CertificateRecord]) -> Vec<&'a CertificateRecord> {
        let query = normalize(&self.query);
        records
            .iter()
            .filter(|record| self.status.matches(&record.status))
            .filter(|record| {
                query.is_empty() || haystack(certificate_terms(record)).contains(&query)
            })
            .collect()
    }
}

/// Students whose name, email or ID contains `query`
pub fn filter_students<'a>(students: &'a [StudentSummary], query: &str) -> Vec<&'a StudentSummary> {
    let query = normalize(query);
    if query.is_empty() {
        return students.iter().collect();
    }

    students
        .iter()
        .filter(|student| {
            let id = id_text(&student.id);
            let terms = [
                student.full_name.as_deref(),
                student.name.as_deref(),
                student.email.as_deref(),
                Some(id.as_str()),
            ];
            haystack(terms).contains(&query)
        })
        .collect()
}

/// Certificate counts for one student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CertificateStats {
    pub total: usize,
    pub active: usize,
    pub revoked: usize,
}

impl CertificateStats {
    pub fn from_records(records: &[CertificateRecord]) -> Self {
        let active = records
            .iter()
            .filter(|r| r.status.is(CertificateStatus::Active))
            .count();
        Self {
            total: records.len(),
            active,
            revoked: records.len() - active,
        }
    }
}

/// Split a comma-separated skills string into trimmed, non-empty entries
pub fn split_skills(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn certificate_terms(record: &CertificateRecord) -> [Option<&str>; 4] {
    [
        record.student.as_ref().and_then(|s| s.display_name()),
        Some(record.course_name.as_str()),
        record.certificate_id.as_deref(),
        Some(record.skills_learned.as_str()),
    ]
}

fn haystack<'a>(terms: impl IntoIterator<Item = Option<&'a str>>) -> String {
    terms
        .into_iter()
        .flatten()
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: u64, student: &str, course: &str, cert_id: &str, status: &str) -> CertificateRecord {
        serde_json::from_value(json!({
            "id": id,
            "certificateId": cert_id,
            "student": { "fullName": student },
            "courseName": course,
            "skillsLearned": "MS Office, Tally, Typing",
            "status": status,
        }))
        .unwrap()
    }

    fn records() -> Vec<CertificateRecord> {
        vec![
            record(1, "Jane Doe", "Tally", "ECC-0001", "active"),
            record(2, "John Roe", "Typing", "ECC-0002", "revoked"),
            record(3, "Asha Rao", "Web Design", "ECC-0003", "active"),
        ]
    }

    fn ids(found: &[&CertificateRecord]) -> Vec<u64> {
        found.iter().map(|r| r.id.as_u64().unwrap()).collect()
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let records = records();
        let found = CertificateFilter::new("   ", StatusFilter::All).apply(&records);
        assert_eq!(ids(&found), vec![1, 2, 3]);
    }

    #[test]
    fn test_query_is_case_insensitive_across_fields() {
        let records = records();
        assert_eq!(
            ids(&CertificateFilter::new(" JANE ", StatusFilter::All).apply(&records)),
            vec![1]
        );
        assert_eq!(
            ids(&CertificateFilter::new("ecc-0003", StatusFilter::All).apply(&records)),
            vec![3]
        );
        assert_eq!(
            ids(&CertificateFilter::new("typing", StatusFilter::All).apply(&records)),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_status_and_query_combine() {
        let records = records();
        assert_eq!(
            ids(&CertificateFilter::new("", StatusFilter::Active).apply(&records)),
            vec![1, 3]
        );
        assert_eq!(
            ids(&CertificateFilter::new("tally", StatusFilter::Revoked).apply(&records)),
            vec![2]
        );
        assert!(CertificateFilter::new("nobody", StatusFilter::All)
            .apply(&records)
            .is_empty());
    }

    #[test]
    fn test_legacy_student_name_is_searchable() {
        let records: Vec<CertificateRecord> = vec![
            serde_json::from_value(json!({
                "id": 9,
                "student": { "name": "Legacy Student" },
                "courseName": "Basics",
            }))
            .unwrap(),
        ];
        let found = CertificateFilter::new("legacy", StatusFilter::All).apply(&records);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_student_filter_matches_email_and_id() {
        let students: Vec<StudentSummary> = serde_json::from_value(json!([
            { "id": 17, "fullName": "Jane Doe", "email": "jane@example.com" },
            { "id": "s-204", "name": "John Roe" },
        ]))
        .unwrap();

        assert_eq!(filter_students(&students, "").len(), 2);
        assert_eq!(filter_students(&students, "EXAMPLE.COM").len(), 1);
        assert_eq!(filter_students(&students, "17")[0].id, json!(17));
        assert_eq!(filter_students(&students, "s-204")[0].name.as_deref(), Some("John Roe"));
        assert!(filter_students(&students, "zzz").is_empty());
    }

    #[test]
    fn test_unknown_status_only_matches_all() {
        let mut records = records();
        records.push(record(4, "Old Student", "Basics", "ECC-0004", "expired"));

        assert_eq!(
            ids(&CertificateFilter::new("", StatusFilter::All).apply(&records)),
            vec![1, 2, 3, 4]
        );
        assert_eq!(
            ids(&CertificateFilter::new("", StatusFilter::Revoked).apply(&records)),
            vec![2]
        );
        assert_eq!(CertificateStats::from_records(&records).revoked, 2);
    }

    #[test]
    fn test_stats_count_revoked_as_remainder() {
        let stats = CertificateStats::from_records(&records());
        assert_eq!(
            stats,
            CertificateStats {
                total: 3,
                active: 2,
                revoked: 1
            }
        );
    }

    #[test]
    fn test_split_skills() {
        assert_eq!(
            split_skills(" MS Office, Tally,, Typing ,"),
            vec!["MS Office", "Tally", "Typing"]
        );
        assert!(split_skills("  ").is_empty());
    }
}
