// src/app/list.rs
//! Film list state: where the movies came from, and what the grid should show.

use std::time::Duration;

use tracing::{debug, info};

use super::data::Movie;
use super::loader::{default_sources, FeedLoader, FeedSource, LoadMsg};
use super::screenings::{first_screening_time, is_all_sold_out};
use super::utils::truncate_chars;
use crate::config::AppConfig;

pub const NO_MOVIES_MESSAGE: &str = "No movies found.";
const DESCRIPTION_MAX_CHARS: usize = 140;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListState {
    Loading(String),
    Ready,
    Failed(String),
}

/// What the list area renders this frame.
#[derive(Debug, PartialEq)]
pub enum ListBody<'a> {
    Loading(&'a str),
    Failed(&'a str),
    Empty,
    NoMatches,
    Cards(Vec<usize>),
}

pub struct FilmList {
    movies: Vec<Movie>,
    state: ListState,
    loader: Option<FeedLoader>,
    source_label: Option<String>,
}

impl FilmList {
    /// Parent-supplied movies take precedence over fetching; otherwise walk the feed sources.
    pub fn mount(preloaded: Option<Vec<Movie>>, cfg: &AppConfig) -> Self {
        match preloaded {
            Some(movies) => Self::with_movies(movies),
            None => Self::fetch(
                default_sources(&cfg.feed),
                Duration::from_secs(cfg.remote_timeout_secs),
            ),
        }
    }

    pub fn with_movies(movies: Vec<Movie>) -> Self {
        debug!("film list mounted with {} preloaded movies", movies.len());
        Self {
            movies,
            state: ListState::Ready,
            loader: None,
            source_label: None,
        }
    }

    pub fn fetch(sources: Vec<FeedSource>, timeout: Duration) -> Self {
        Self {
            movies: Vec::new(),
            state: ListState::Loading(String::from("loading...")),
            loader: Some(FeedLoader::spawn(sources, timeout)),
            source_label: None,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.loader.is_some()
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn source_label(&self) -> Option<&str> {
        self.source_label.as_deref()
    }

    /// Drain loader messages. Returns true when something changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Some(msg) = self.loader.as_ref().and_then(FeedLoader::try_recv) {
            changed = true;
            match msg {
                LoadMsg::Info(line) => self.state = ListState::Loading(line),
                LoadMsg::Done(feed) => {
                    info!("{} movies ready from {}", feed.movies.len(), feed.source_label);
                    self.movies = feed.movies;
                    self.source_label = Some(feed.source_label);
                    self.state = ListState::Ready;
                    self.loader = None;
                }
                LoadMsg::Error(message) => {
                    self.state = ListState::Failed(message);
                    self.loader = None;
                }
            }
        }
        changed
    }

    pub fn body(&self, visible: Vec<usize>) -> ListBody<'_> {
        match &self.state {
            ListState::Loading(line) => ListBody::Loading(line),
            ListState::Failed(message) => ListBody::Failed(message),
            ListState::Ready if self.movies.is_empty() => ListBody::Empty,
            ListState::Ready if visible.is_empty() => ListBody::NoMatches,
            ListState::Ready => ListBody::Cards(visible),
        }
    }

    /// Hand the movie at `idx` to `on_select`. Returns false for a stale index.
    pub fn select<F>(&self, idx: usize, mut on_select: F) -> bool
    where
        F: FnMut(&Movie),
    {
        match self.movies.get(idx) {
            Some(movie) => {
                on_select(movie);
                true
            }
            None => false,
        }
    }
}

/// Ticket control shared by cards and the detail pane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cta<'a> {
    BuyTicket(&'a str),
    SoldOut,
}

impl<'a> Cta<'a> {
    pub fn for_movie(movie: &'a Movie) -> Self {
        if is_all_sold_out(&movie.screenings) {
            Self::SoldOut
        } else {
            Self::BuyTicket(movie.ticket_url())
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BuyTicket(_) => "Buy Ticket",
            Self::SoldOut => "Sold Out",
        }
    }

    /// URL to open on click; `None` when the control is inert.
    pub fn target(self) -> Option<&'a str> {
        match self {
            Self::BuyTicket(url) if !url.is_empty() => Some(url),
            _ => None,
        }
    }
}

/// Display strings for one summary card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardModel<'a> {
    pub title: &'a str,
    pub poster_url: &'a str,
    pub screen_time: String,
    pub director_line: String,
    pub duration: String,
    pub description: String,
    pub cta: Cta<'a>,
}

impl<'a> CardModel<'a> {
    pub fn from_movie(movie: &'a Movie) -> Self {
        Self {
            title: movie.title(),
            poster_url: movie.poster_url(),
            screen_time: first_screening_time(&movie.screenings),
            director_line: format!("Director: {}", movie.director()),
            duration: movie.duration_line(),
            description: truncate_chars(movie.synopsis(), DESCRIPTION_MAX_CHARS),
            cta: Cta::for_movie(movie),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::data::{Screening, Showtime, SOLD_OUT};
    use std::path::PathBuf;
    use std::time::Instant;

    fn movie(title: &str, statuses: &[&str]) -> Movie {
        let screenings = if statuses.is_empty() {
            Vec::new()
        } else {
            vec![Screening {
                date: Some("Apr 10".into()),
                showtimes: statuses
                    .iter()
                    .map(|s| Showtime {
                        time: Some("7:00 PM".into()),
                        status: Some((*s).into()),
                    })
                    .collect(),
            }]
        };
        Movie {
            title: Some(title.into()),
            director: Some("Agnès Varda".into()),
            year: Some("1962".into()),
            runtime: Some("90min".into()),
            link: Some(format!("https://metrograph.com/film/{title}")),
            screenings,
            ..Default::default()
        }
    }

    fn wait_settled(list: &mut FilmList) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while list.is_fetching() {
            list.poll();
            assert!(Instant::now() < deadline, "loader never settled");
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn preloaded_list_skips_fetching() {
        let cfg = AppConfig::default();
        let list = FilmList::mount(Some(vec![movie("Cléo from 5 to 7", &["Available"])]), &cfg);
        assert!(!list.is_fetching());
        assert_eq!(list.state(), &ListState::Ready);
        assert_eq!(list.body(vec![0]), ListBody::Cards(vec![0]));
        assert_eq!(list.movies()[0].title(), "Cléo from 5 to 7");
    }

    #[test]
    fn preloaded_empty_list_shows_placeholder() {
        let list = FilmList::with_movies(Vec::new());
        assert!(!list.is_fetching());
        assert_eq!(list.body(Vec::new()), ListBody::Empty);
    }

    #[test]
    fn exhausted_sources_show_error_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![
            FeedSource::File(dir.path().join("films.json")),
            FeedSource::File(PathBuf::from("/definitely/not/here/films.json")),
            FeedSource::File(dir.path().join("metrograph_movies.json")),
            FeedSource::Remote("http://127.0.0.1:9/".into()),
        ];
        let mut list = FilmList::fetch(sources, Duration::from_secs(2));
        assert!(matches!(list.body(Vec::new()), ListBody::Loading(_)));
        wait_settled(&mut list);
        assert_eq!(
            list.body(Vec::new()),
            ListBody::Failed(crate::app::loader::LOAD_FAILED_MESSAGE)
        );
    }

    #[test]
    fn fetched_empty_feed_shows_no_movies() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("films.json");
        std::fs::write(&p, "[]").unwrap();
        let mut list = FilmList::fetch(vec![FeedSource::File(p)], Duration::from_secs(1));
        wait_settled(&mut list);
        assert_eq!(list.body(Vec::new()), ListBody::Empty);
        assert!(list.source_label().is_some());
    }

    #[test]
    fn filter_without_matches_is_distinct_from_empty() {
        let list = FilmList::with_movies(vec![movie("Vagabond", &[])]);
        assert_eq!(list.body(Vec::new()), ListBody::NoMatches);
    }

    #[test]
    fn select_passes_the_exact_movie() {
        let list = FilmList::with_movies(vec![movie("Vagabond", &[]), movie("Le Bonheur", &[])]);
        let mut got: Option<*const Movie> = None;
        assert!(list.select(1, |m| got = Some(m as *const Movie)));
        assert!(std::ptr::eq(got.unwrap(), &list.movies()[1]));
        assert!(!list.select(5, |_| panic!("stale index must not select")));
    }

    #[test]
    fn card_model_strings() {
        let m = movie("Vagabond", &["Available", SOLD_OUT]);
        let card = CardModel::from_movie(&m);
        assert_eq!(card.title, "Vagabond");
        assert_eq!(card.screen_time, "Apr 10 - 7:00 PM");
        assert_eq!(card.director_line, "Director: Agnès Varda");
        assert_eq!(card.duration, "1962/90min");
        assert_eq!(card.cta, Cta::BuyTicket("https://metrograph.com/film/Vagabond"));
        assert_eq!(card.cta.label(), "Buy Ticket");
    }

    #[test]
    fn coming_soon_card_is_not_sold_out() {
        let m = movie("Le Bonheur", &[]);
        let card = CardModel::from_movie(&m);
        assert_eq!(card.screen_time, "Coming Soon");
        assert!(matches!(card.cta, Cta::BuyTicket(_)));
    }

    #[test]
    fn sold_out_cta_is_inert() {
        let m = movie("Vagabond", &[SOLD_OUT, SOLD_OUT]);
        let cta = Cta::for_movie(&m);
        assert_eq!(cta, Cta::SoldOut);
        assert_eq!(cta.label(), "Sold Out");
        assert_eq!(cta.target(), None);
        assert_eq!(Cta::BuyTicket("").target(), None);
    }
}
