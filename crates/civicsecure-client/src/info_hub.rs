//! Information hub: government scheme carousel, help resources and support
//! contacts. All content is static.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scheme {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    /// Asset name of the banner image.
    pub image: &'static str,
}

pub const SCHEMES: [Scheme; 3] = [
    Scheme { id: 1, title: "PM Awas Yojana", description: "Affordable housing scheme for all sections of society.", image: "scheme1.png" },
    Scheme { id: 2, title: "Digital India", description: "Transforming India into a digitally empowered society.", image: "scheme2.png" },
    Scheme { id: 3, title: "Skill India Mission", description: "Enhancing employability through skill development programs.", image: "scheme3.png" },
];

/// Schemes shown side by side.
pub const VISIBLE_SCHEMES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpCard {
    pub title: &'static str,
    pub description: &'static str,
    pub button_text: &'static str,
}

pub const HELP_CARDS: [HelpCard; 3] = [
    HelpCard {
        title: "User Guide",
        description: "Step-by-step instructions on how to submit complaints, track status, and use all features of CivicSecure.",
        button_text: "Read Guide",
    },
    HelpCard {
        title: "FAQs",
        description: "Find answers to commonly asked questions about the grievance redressal process and platform usage.",
        button_text: "View FAQs",
    },
    HelpCard {
        title: "Emergency Protocols",
        description: "Important information about what to do in emergency situations and how to quickly get help.",
        button_text: "Learn More",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportContact {
    pub channel: &'static str,
    pub address: &'static str,
    pub availability: &'static str,
}

pub const SUPPORT_CONTACTS: [SupportContact; 2] = [
    SupportContact { channel: "Helpline", address: "1800-XXX-XXXX (Toll-free)", availability: "Available 24/7" },
    SupportContact { channel: "Email Support", address: "support@civicsecure.gov.in", availability: "Response within 24 hours" },
];

/// Position of the scheme carousel. Both directions wrap around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemeCarousel {
    index: usize,
}

impl SchemeCarousel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % SCHEMES.len();
    }

    pub fn prev(&mut self) {
        self.index = (self.index + SCHEMES.len() - 1) % SCHEMES.len();
    }

    /// The schemes currently on screen, starting at the carousel position.
    pub fn visible(&self) -> [&'static Scheme; VISIBLE_SCHEMES] {
        std::array::from_fn(|i| &SCHEMES[(self.index + i) % SCHEMES.len()])
    }
}
