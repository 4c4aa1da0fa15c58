use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Comedy,
    Drama,
    Fantasy,
    Horror,
    Thriller,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Crime,
}

impl Genre {
    pub const ALL: [Genre; 9] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Comedy,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::Thriller,
        Genre::SciFi,
        Genre::Crime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::Horror => "Horror",
            Genre::Thriller => "Thriller",
            Genre::SciFi => "Sci-Fi",
            Genre::Crime => "Crime",
        }
    }

    /// Exact, case-sensitive lookup by serialized name.
    pub fn from_name(name: &str) -> Option<Self> {
        Genre::ALL.into_iter().find(|g| g.as_str() == name)
    }

    /// Case-insensitive comparison used by the list filter.
    pub fn matches(self, name: &str) -> bool {
        self.as_str().to_lowercase() == name.to_lowercase()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: u32,
    #[serde(default)]
    pub rate: f64,
    pub poster: String,
    pub genre: Vec<Genre>,
}

impl Movie {
    pub fn from_new(id: String, new: NewMovie) -> Self {
        Self {
            id,
            title: new.title,
            year: new.year,
            director: new.director,
            duration: new.duration,
            rate: new.rate,
            poster: new.poster,
            genre: new.genre,
        }
    }

    /// Shallow merge: fields present in the patch replace the current ones.
    pub fn apply(&mut self, patch: MoviePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(director) = patch.director {
            self.director = director;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(rate) = patch.rate {
            self.rate = rate;
        }
        if let Some(poster) = patch.poster {
            self.poster = poster;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
    }
}

/// A fully validated movie body, ready to be stored once it has an id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: u32,
    pub rate: f64,
    pub poster: String,
    pub genre: Vec<Genre>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub director: Option<String>,
    pub duration: Option<u32>,
    pub rate: Option<f64>,
    pub poster: Option<String>,
    pub genre: Option<Vec<Genre>>,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}
