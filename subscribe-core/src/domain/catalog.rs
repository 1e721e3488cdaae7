//! Catalog of well-known subscription services offered when naming a record

use serde::Serialize;

use super::display::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub category: &'static str,
    pub link: &'static str,
    #[serde(skip)]
    pub color: Color,
}

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Netflix",
        category: "Entertainment",
        link: "https://www.netflix.com",
        color: Color::RED,
    },
    CatalogEntry {
        name: "Spotify",
        category: "Music",
        link: "https://www.spotify.com",
        color: Color::GREEN,
    },
    CatalogEntry {
        name: "Apple Music",
        category: "Music",
        link: "https://music.apple.com",
        color: Color::PINK,
    },
    CatalogEntry {
        name: "Disney+",
        category: "Entertainment",
        link: "https://www.disneyplus.com",
        color: Color::BLUE,
    },
    CatalogEntry {
        name: "YouTube Premium",
        category: "Entertainment",
        link: "https://www.youtube.com/premium",
        color: Color::RED,
    },
    CatalogEntry {
        name: "Naver",
        category: "Independent",
        link: "https://www.naver.com",
        color: Color::GREEN,
    },
];

/// Case-insensitive substring search. An empty query returns everything.
pub fn search(query: &str) -> Vec<&'static CatalogEntry> {
    let query = query.trim().to_lowercase();
    CATALOG
        .iter()
        .filter(|entry| query.is_empty() || entry.name.to_lowercase().contains(&query))
        .collect()
}

/// Exact (case-insensitive) lookup by service name
pub fn find(name: &str) -> Option<&'static CatalogEntry> {
    let name = name.trim();
    CATALOG.iter().find(|entry| entry.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_returns_all() {
        assert_eq!(search("").len(), CATALOG.len());
        assert_eq!(search("   ").len(), CATALOG.len());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let names: Vec<_> = search("MUSIC").iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Apple Music"]);

        let names: Vec<_> = search("tube").iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["YouTube Premium"]);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("netflix").map(|e| e.category), Some("Entertainment"));
        assert!(find("Hulu").is_none());
    }
}
