use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub post_id: u64,
    pub id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

/// Sizes of the generated dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedSize {
    pub posts: u64,
    pub comments_per_post: u64,
    pub users: u64,
}

impl Default for SeedSize {
    fn default() -> Self {
        Self {
            posts: 100,
            comments_per_post: 5,
            users: 10,
        }
    }
}

/// Everything the server serves. Read-only once the router is built.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub comments: Vec<Comment>,
    pub users: Vec<User>,
    /// Answer every request with 503 instead of data.
    pub unavailable: bool,
}

const WORDS: &[&str] = &[
    "alias", "odio", "sit", "quo", "vero", "eaque", "laudantium", "dolore", "est", "natus",
    "repellat", "illum", "voluptas", "nihil", "quia", "molestias", "accusantium", "harum",
    "omnis", "fugit", "neque", "tempora", "magnam", "ipsum", "dolor", "labore", "autem",
];

const FIRST_NAMES: &[&str] = &[
    "Eliseo", "Jayne", "Nikita", "Lew", "Hayden", "Presley", "Dallas", "Mallory", "Meghan",
    "Carmen", "Veronica", "Oswald", "Kariane", "Nathan", "Maynard", "Christine",
];

const DOMAINS: &[&str] = &["gardner.biz", "sydney.com", "garfield.biz", "alysha.tv", "althea.biz", "kiana.ca"];

const CITIES: &[&str] = &[
    "Gwenborough", "Wisokyburgh", "McKenziehaven", "South Elvis", "Roscoeview", "South Christy",
    "Howemouth", "Aliyaview", "Bartholomebury", "Lebsackbury",
];

fn pick(pool: &'static [&'static str], n: u64) -> &'static str {
    pool[(n % pool.len() as u64) as usize]
}

fn phrase(seed: u64, len: u64) -> String {
    (0..len)
        .map(|i| pick(WORDS, seed.wrapping_mul(7).wrapping_add(i * 13)))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Dataset {
    /// Deterministic data shaped like the public placeholder API.
    pub fn seeded(size: SeedSize) -> Self {
        let mut comments = Vec::new();
        for post_id in 1..=size.posts {
            for n in 0..size.comments_per_post {
                let id = (post_id - 1) * size.comments_per_post + n + 1;
                let first = pick(FIRST_NAMES, id * 3);
                let email = if id % 2 == 0 {
                    format!("{first}@{}", pick(DOMAINS, id))
                } else {
                    format!("{}@{}", first.to_lowercase(), pick(DOMAINS, id))
                };
                comments.push(Comment {
                    post_id,
                    id,
                    name: phrase(id, 3 + id % 3),
                    email,
                    body: phrase(id + 101, 12),
                });
            }
        }

        let users = (1..=size.users)
            .map(|id| {
                let first = pick(FIRST_NAMES, id);
                User {
                    id,
                    name: format!("{first} {}", capitalize(pick(WORDS, id * 5))),
                    username: format!("{first}{id}"),
                    email: format!("{first}@{}", pick(DOMAINS, id)),
                    address: Address {
                        street: format!("{} Light", capitalize(pick(WORDS, id + 3))),
                        suite: format!("Apt. {}", 100 + id * 37),
                        city: pick(CITIES, id - 1).to_string(),
                        zipcode: format!("{:05}-{:04}", 10_000 + id * 791, 1_000 + id * 17),
                        geo: Geo {
                            lat: format!("{:.4}", -37.3159 + id as f64 * 4.1),
                            lng: format!("{:.4}", 81.1496 - id as f64 * 9.7),
                        },
                    },
                    phone: format!("1-770-736-{:04} x{}", 8031 + id, 56442 + id),
                    website: format!("{}.org", pick(WORDS, id * 2)),
                    company: Company {
                        name: format!("{}-{}", capitalize(pick(WORDS, id)), capitalize(pick(WORDS, id + 9))),
                        catch_phrase: format!("Multi-layered {}", phrase(id, 2)),
                        bs: format!("harness {}", phrase(id + 1, 2)),
                    },
                }
            })
            .collect();

        Self {
            comments,
            users,
            unavailable: false,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Server settings read from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub seed: SeedSize,
    pub unavailable: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, std::io::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, std::io::Error> {
        let defaults = SeedSize::default();
        Ok(Self {
            port: parse_var(&lookup, "PORT", 3000)?,
            seed: SeedSize {
                posts: parse_var(&lookup, "MOCK_POSTS", defaults.posts)?,
                comments_per_post: parse_var(&lookup, "MOCK_COMMENTS_PER_POST", defaults.comments_per_post)?,
                users: parse_var(&lookup, "MOCK_USERS", defaults.users)?,
            },
            unavailable: parse_var(&lookup, "MOCK_UNAVAILABLE", false)?,
        })
    }

    pub fn dataset(&self) -> Dataset {
        Dataset {
            unavailable: self.unavailable,
            ..Dataset::seeded(self.seed)
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, std::io::Error> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{key} has an invalid value: {raw:?}"),
            )
        }),
    }
}

pub type Db = Arc<Dataset>;

pub fn app() -> Router {
    app_with(Dataset::seeded(SeedSize::default()))
}

pub fn app_with(dataset: Dataset) -> Router {
    let db: Db = Arc::new(dataset);
    Router::new()
        .route("/comments", get(list_comments))
        .route("/users", get(list_users))
        .with_state(db)
}

pub async fn run_with(listener: TcpListener, dataset: Dataset) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(dataset)).await
}

async fn list_comments(State(db): State<Db>) -> Result<Json<Vec<Comment>>, StatusCode> {
    if db.unavailable {
        info!("refusing /comments: dataset marked unavailable");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    info!(count = db.comments.len(), "serving /comments");
    Ok(Json(db.comments.clone()))
}

async fn list_users(State(db): State<Db>) -> Result<Json<Vec<User>>, StatusCode> {
    if db.unavailable {
        info!("refusing /users: dataset marked unavailable");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    info!(count = db.users.len(), "serving /users");
    Ok(Json(db.users.clone()))
}
