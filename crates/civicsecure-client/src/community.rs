//! Community boards: a fixed list of topics and an in-memory post board.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Community {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub members: &'static str,
}

pub const COMMUNITIES: [Community; 10] = [
    Community { id: 1, name: "Cleanliness", description: "Discuss and report issues related to public cleanliness.", members: "42K members" },
    Community { id: 2, name: "Traffic", description: "Traffic problems, solutions, and road safety discussions.", members: "38K members" },
    Community { id: 3, name: "Water Supply", description: "Water supply, wastage, and related issues.", members: "35K members" },
    Community { id: 4, name: "Electricity", description: "Frequent power cuts, electricity bills & solutions.", members: "32K members" },
    Community { id: 5, name: "Sanitation", description: "Garbage disposal and sanitation improvement ideas.", members: "30K members" },
    Community { id: 6, name: "Roads", description: "Potholes, broken footpaths & road maintenance.", members: "28K members" },
    Community { id: 7, name: "Public Transport", description: "Bus, metro, and other public transport concerns.", members: "27K members" },
    Community { id: 8, name: "Pollution", description: "Air, noise, and water pollution discussions.", members: "25K members" },
    Community { id: 9, name: "Healthcare", description: "Access to hospitals, quality of service, and complaints.", members: "24K members" },
    Community { id: 10, name: "Citizen Safety", description: "Street lights, women's safety, and public safety issues.", members: "22K members" },
];

pub fn community(id: u32) -> Option<&'static Community> {
    COMMUNITIES.iter().find(|c| c.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub title: String,
    /// Reference to an attached image, if any.
    pub image: Option<String>,
    pub votes: u32,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Posts shown inside a community, newest first.
#[derive(Debug, Clone)]
pub struct Board {
    posts: Vec<Post>,
    next_id: u64,
}

impl Board {
    /// A board with the four starter posts, dated relative to `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let seed = [
            ("Pothole near Market Road causing traffic jams", "potholes.webp", 14, "Citizen123", Duration::hours(2)),
            ("Garbage overflow in Sector 15 park area", "garbage.webp", 9, "ConcernedResident", Duration::hours(5)),
            ("Broken footpath tiles at City Center", "street.webp", 11, "SafetyFirst", Duration::days(1)),
            ("Waterlogging near residential area after rain", "water.webp", 7, "RainwaterWoes", Duration::days(2)),
        ];

        let posts: Vec<Post> = seed
            .into_iter()
            .enumerate()
            .map(|(i, (title, image, votes, author, age))| Post {
                id: i as u64 + 1,
                title: title.to_string(),
                image: Some(image.to_string()),
                votes,
                author: author.to_string(),
                created_at: now - age,
            })
            .collect();

        Self {
            next_id: posts.len() as u64 + 1,
            posts,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Add a post by the current user at the top of the board. Returns `None`
    /// when the title is blank.
    pub fn create_post(&mut self, title: &str, image: Option<String>, now: DateTime<Utc>) -> Option<&Post> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        let post = Post {
            id: self.next_id,
            title: title.to_string(),
            image,
            votes: 0,
            author: "You".to_string(),
            created_at: now,
        };
        self.next_id += 1;
        self.posts.insert(0, post);
        self.posts.first()
    }

    /// Apply an up/down vote. Counts never drop below zero.
    pub fn vote(&mut self, post_id: u64, delta: i32) -> Option<u32> {
        let post = self.posts.iter_mut().find(|p| p.id == post_id)?;
        post.votes = (i64::from(post.votes) + i64::from(delta)).clamp(0, i64::from(u32::MAX)) as u32;
        Some(post.votes)
    }
}

/// "Just now", "5 minutes ago", "2 hours ago", "1 day ago".
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now - at;
    let (n, unit) = if age.num_days() > 0 {
        (age.num_days(), "day")
    } else if age.num_hours() > 0 {
        (age.num_hours(), "hour")
    } else if age.num_minutes() > 0 {
        (age.num_minutes(), "minute")
    } else {
        return "Just now".to_string();
    };
    let plural = if n == 1 { "" } else { "s" };
    format!("{n} {unit}{plural} ago")
}
