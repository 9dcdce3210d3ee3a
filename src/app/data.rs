// src/app/data.rs
use serde::{Deserialize, Deserializer};

pub const SOLD_OUT: &str = "Sold Out";

/// One film from the feed. Every field is optional on the wire.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Movie {
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub synopsis: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub year: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub runtime: Option<String>,
    pub poster_url: Option<String>,
    pub link: Option<String>,
    pub detail_url: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub screenings: Vec<Screening>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Screening {
    pub date: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub showtimes: Vec<Showtime>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Showtime {
    pub time: Option<String>,
    pub status: Option<String>,
}

impl Movie {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn director(&self) -> &str {
        self.director.as_deref().unwrap_or("")
    }

    pub fn synopsis(&self) -> &str {
        self.synopsis.as_deref().unwrap_or("")
    }

    pub fn poster_url(&self) -> &str {
        self.poster_url.as_deref().unwrap_or("")
    }

    /// Ticket link, falling back to the detail page.
    pub fn ticket_url(&self) -> &str {
        self.link
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.detail_url.as_deref())
            .unwrap_or("")
    }

    /// "year/runtime"; missing halves render empty.
    pub fn duration_line(&self) -> String {
        format!(
            "{}/{}",
            self.year.as_deref().unwrap_or(""),
            self.runtime.as_deref().unwrap_or("")
        )
    }
}

impl Screening {
    pub fn date(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }
}

impl Showtime {
    pub fn time(&self) -> &str {
        self.time.as_deref().unwrap_or("")
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }

    pub fn is_sold_out(&self) -> bool {
        self.status.as_deref() == Some(SOLD_OUT)
    }
}

/// Decode a feed body into movies.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<Movie>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

fn string_or_number<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn null_as_empty<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_scraper_output() {
        let body = br#"[{
            "title": "Paris, Texas",
            "director": "Wim Wenders",
            "year": "1984",
            "runtime": "145min",
            "detail_url": "https://metrograph.com/film/?vista_film_id=9999000001",
            "vista_film_id": "9999000001",
            "screenings": [
                {"date": "Thursday April 10", "showtimes": [{"time": "7:00pm", "status": "Available"}]}
            ]
        }]"#;
        let movies = parse_feed(body).unwrap();
        assert_eq!(movies.len(), 1);
        let m = &movies[0];
        assert_eq!(m.title(), "Paris, Texas");
        assert_eq!(m.duration_line(), "1984/145min");
        assert_eq!(
            m.ticket_url(),
            "https://metrograph.com/film/?vista_film_id=9999000001"
        );
        assert_eq!(m.screenings[0].showtimes[0].time(), "7:00pm");
    }

    #[test]
    fn numbers_and_nulls_are_tolerated() {
        let body = br#"[{"id": 7, "year": 2001, "runtime": 95, "screenings": null},
                        {"screenings": [{"date": "Apr 10", "showtimes": null}]}]"#;
        let movies = parse_feed(body).unwrap();
        assert_eq!(movies[0].id.as_deref(), Some("7"));
        assert_eq!(movies[0].duration_line(), "2001/95");
        assert!(movies[0].screenings.is_empty());
        assert!(movies[1].screenings[0].showtimes.is_empty());
        assert_eq!(movies[1].title(), "");
        assert_eq!(movies[1].duration_line(), "/");
    }

    #[test]
    fn link_wins_over_detail_url_unless_empty() {
        let mut m = Movie {
            link: Some("https://tickets.example/1".into()),
            detail_url: Some("https://detail.example/1".into()),
            ..Default::default()
        };
        assert_eq!(m.ticket_url(), "https://tickets.example/1");
        m.link = Some(String::new());
        assert_eq!(m.ticket_url(), "https://detail.example/1");
    }

    #[test]
    fn non_array_feed_is_an_error() {
        assert!(parse_feed(br#"{"movies": []}"#).is_err());
        assert!(parse_feed(b"<html>").is_err());
    }
}
