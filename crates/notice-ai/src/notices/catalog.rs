//! Fixed notice data served by the list and search endpoints. Submissions are
//! never stored, so these never change.

use super::domain::{Notice, SearchHit};

const NOTICES: [Notice; 2] = [
    Notice {
        id: "1",
        title: "CSE Exam Schedule",
        category: "Academic",
        importance: "high",
    },
    Notice {
        id: "2",
        title: "Hackathon Registration",
        category: "Event",
        importance: "medium",
    },
];

pub fn list_notices() -> Vec<Notice> {
    NOTICES.to_vec()
}

/// Echoes `query` on a single fixed hit; no matching is performed.
pub fn search_notices(query: &str) -> Vec<SearchHit> {
    let first = &NOTICES[0];
    vec![SearchHit {
        id: first.id,
        title: first.title,
        matched_query: query.to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_is_stable() {
        let notices = list_notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].title, "CSE Exam Schedule");
        assert_eq!(notices[1].importance, "medium");
        assert_eq!(notices, list_notices());
    }

    #[test]
    fn search_echoes_query_verbatim() {
        for query in ["exam", "", "?? nonsense &&"] {
            let hits = search_notices(query);
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].id, "1");
            assert_eq!(hits[0].matched_query, query);
        }
    }
}
