// Per-platform sample records.
// Each platform keeps its scraper's native field names so consumers exercise
// the same field-chain probing they need for real data.

use chrono::{Duration, SecondsFormat, Utc};
use rand::Rng;
use serde_json::{json, Value};
use trendlens_common::{ContentItem, Platform};

struct RedditSample {
    title: &'static str,
    text: &'static str,
    author: &'static str,
    subreddit: &'static str,
    score: i64,
    comments: i64,
}

struct VideoSample {
    title: &'static str,
    description: &'static str,
    author: &'static str,
    views: i64,
    likes: i64,
}

const REDDIT_SAMPLES: &[RedditSample] = &[
    RedditSample {
        title: "Open-weight models are closing the gap faster than expected",
        text: "Benchmarks from this week suggest the newest open releases are within a few points of the frontier on reasoning tasks. Curious what people are seeing in practice.",
        author: "ml_watcher",
        subreddit: "MachineLearning",
        score: 1843,
        comments: 412,
    },
    RedditSample {
        title: "City council approves new bike lane network",
        text: "After two years of debate the council voted 7-2 to fund protected lanes on the four busiest corridors.",
        author: "urbanist_22",
        subreddit: "urbanplanning",
        score: 962,
        comments: 188,
    },
    RedditSample {
        title: "Anyone else noticing grocery prices dropping?",
        text: "Eggs and produce are noticeably cheaper at my local store this month. Is this a seasonal thing or is inflation actually cooling?",
        author: "frugal_fran",
        subreddit: "personalfinance",
        score: 2210,
        comments: 903,
    },
    RedditSample {
        title: "Heat wave forecast for the first week of summer",
        text: "NWS is projecting several days above 100F across the southwest. Stay hydrated and check on neighbors.",
        author: "weather_nerd",
        subreddit: "weather",
        score: 734,
        comments: 96,
    },
    RedditSample {
        title: "Indie game hits 1M sales in its first week",
        text: "A two-person studio just crossed a million copies. The devs posted a breakdown of their marketing spend.",
        author: "pixel_pusher",
        subreddit: "gaming",
        score: 5120,
        comments: 1337,
    },
    RedditSample {
        title: "New study links sleep regularity to heart health",
        text: "Researchers followed 60k participants and found consistent bedtimes mattered more than total hours slept.",
        author: "sci_digest",
        subreddit: "science",
        score: 3390,
        comments: 521,
    },
    RedditSample {
        title: "Remote work policies are shifting again",
        text: "Several large employers announced return-to-office mandates this quarter while startups lean harder into remote hiring.",
        author: "wfh_forever",
        subreddit: "jobs",
        score: 1408,
        comments: 677,
    },
    RedditSample {
        title: "Championship game drew record streaming numbers",
        text: "The final was the most-streamed sporting event in the platform's history according to early figures.",
        author: "stat_head",
        subreddit: "sports",
        score: 2876,
        comments: 844,
    },
    RedditSample {
        title: "Solar installs outpaced every other energy source last year",
        text: "Utility-scale solar accounted for more than half of new generating capacity, with batteries close behind.",
        author: "grid_guru",
        subreddit: "energy",
        score: 1911,
        comments: 302,
    },
    RedditSample {
        title: "What is the best budget travel hack you have used?",
        text: "Looking for tips before a three-week trip through southeast Asia. Hostels, rail passes, anything helps.",
        author: "backpack_bo",
        subreddit: "travel",
        score: 655,
        comments: 415,
    },
    RedditSample {
        title: "Teachers union reaches tentative agreement",
        text: "The deal includes smaller class sizes and a 6% raise over two years. Members vote next week.",
        author: "ed_reporter",
        subreddit: "education",
        score: 1187,
        comments: 233,
    },
    RedditSample {
        title: "Central bank holds rates steady, signals cuts later this year",
        text: "Markets rallied on the statement. Mortgage rates have already started to tick down in anticipation.",
        author: "macro_mike",
        subreddit: "economics",
        score: 1502,
        comments: 390,
    },
];

const TIKTOK_SAMPLES: &[VideoSample] = &[
    VideoSample {
        title: "",
        description: "POV: you finally try the viral cucumber salad #foodtok #recipe",
        author: "kitchen_kai",
        views: 2_400_000,
        likes: 310_000,
    },
    VideoSample {
        title: "",
        description: "3 AI tools that saved me 10 hours this week #productivity #ai",
        author: "techtok_tess",
        views: 1_120_000,
        likes: 98_000,
    },
    VideoSample {
        title: "",
        description: "Day 30 of learning to skateboard at 35 #skate #glowup",
        author: "late_bloomer",
        views: 870_000,
        likes: 121_000,
    },
    VideoSample {
        title: "",
        description: "Why everyone is suddenly talking about sleep banking #health",
        author: "dr_dreams",
        views: 640_000,
        likes: 54_000,
    },
    VideoSample {
        title: "",
        description: "Thrift flip: turning a 2 dollar blazer into a crop jacket #thrift #diy",
        author: "seam_queen",
        views: 1_900_000,
        likes: 260_000,
    },
    VideoSample {
        title: "",
        description: "Budget breakdown of my first month living alone #moneytok",
        author: "cents_and_sense",
        views: 530_000,
        likes: 41_000,
    },
    VideoSample {
        title: "",
        description: "This stadium crowd moment gave me chills #sports #fyp",
        author: "hype_reel",
        views: 3_300_000,
        likes: 505_000,
    },
    VideoSample {
        title: "",
        description: "Hidden beach you can only reach by kayak #travel #wanderlust",
        author: "paddle_pia",
        views: 780_000,
        likes: 88_000,
    },
    VideoSample {
        title: "",
        description: "Rating every new climate pledge in 60 seconds #climate",
        author: "eco_eli",
        views: 410_000,
        likes: 37_000,
    },
    VideoSample {
        title: "",
        description: "Speedrunning the new indie roguelike, world record attempt #gaming",
        author: "frame_perfect",
        views: 990_000,
        likes: 76_000,
    },
];

const YOUTUBE_SAMPLES: &[VideoSample] = &[
    VideoSample {
        title: "The Real Cost of Running an AI Model",
        description: "We break down GPU pricing, energy usage and what it actually costs to serve a large language model at scale.",
        author: "Compute Explained",
        views: 845_000,
        likes: 31_000,
    },
    VideoSample {
        title: "I Tried Living on $20 a Week",
        description: "A full month of budget meals, what worked, what did not, and the grocery list you can copy.",
        author: "Thrifty Table",
        views: 1_600_000,
        likes: 72_000,
    },
    VideoSample {
        title: "Every Goal From the Championship Final",
        description: "Extended highlights with commentary from both broadcasts.",
        author: "Match Replay",
        views: 4_200_000,
        likes: 120_000,
    },
    VideoSample {
        title: "How Heat Domes Form",
        description: "A meteorologist explains the physics behind this summer's record temperatures.",
        author: "Sky Science",
        views: 390_000,
        likes: 18_500,
    },
    VideoSample {
        title: "Building a Home Battery From Recycled Cells",
        description: "Step by step build of a 10kWh wall battery, including safety gear and BMS wiring.",
        author: "Garage Volts",
        views: 1_050_000,
        likes: 64_000,
    },
    VideoSample {
        title: "The Indie Game Nobody Expected to Win",
        description: "Inside the tiny studio behind this year's surprise hit.",
        author: "Pixel Docs",
        views: 720_000,
        likes: 41_000,
    },
    VideoSample {
        title: "Remote Work Is Changing Cities",
        description: "Data on migration, rents and downtown foot traffic five years after the shift.",
        author: "Urban Lens",
        views: 510_000,
        likes: 22_000,
    },
    VideoSample {
        title: "Sleep Scientists Answer Your Questions",
        description: "Chronotypes, naps, caffeine timing and the one habit that matters most.",
        author: "Wired Health",
        views: 2_300_000,
        likes: 95_000,
    },
    VideoSample {
        title: "Backpacking Southeast Asia on a Budget",
        description: "Routes, costs and the mistakes I made so you do not have to.",
        author: "Nomad Notes",
        views: 960_000,
        likes: 48_000,
    },
    VideoSample {
        title: "What the Rate Decision Means for You",
        description: "Mortgages, savings accounts and credit cards after this week's central bank meeting.",
        author: "Money Minute",
        views: 330_000,
        likes: 12_000,
    },
];

/// A timestamp `index` steps back from now, with up to an hour of jitter per step.
fn recent_timestamp(index: usize, step_minutes: i64) -> String {
    let jitter = rand::rng().random_range(0..60);
    let offset = Duration::minutes(index as i64 * step_minutes + jitter);
    (Utc::now() - offset).to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn reddit_item(index: usize, sample: &RedditSample) -> Value {
    let id = short_id();
    json!({
        "id": format!("t3_{id}"),
        "title": sample.title,
        "text": sample.text,
        "author": sample.author,
        "subreddit": sample.subreddit,
        "score": sample.score,
        "num_comments": sample.comments,
        "created_at": recent_timestamp(index, 90),
        "url": format!("https://www.reddit.com/r/{}/comments/{id}", sample.subreddit),
        "platform": "reddit",
    })
}

fn tiktok_item(index: usize, sample: &VideoSample) -> Value {
    let id = rand::rng().random_range(7_000_000_000_000_000_000u64..7_400_000_000_000_000_000);
    json!({
        "id": id.to_string(),
        "description": sample.description,
        "author": sample.author,
        "views": sample.views,
        "likes": sample.likes,
        "timestamp": recent_timestamp(index, 75),
        "url": format!("https://www.tiktok.com/@{}/video/{id}", sample.author),
        "platform": "tiktok",
    })
}

fn youtube_item(index: usize, sample: &VideoSample) -> Value {
    let id = short_id();
    json!({
        "id": id,
        "title": sample.title,
        "description": sample.description,
        "channel_title": sample.author,
        "view_count": sample.views,
        "like_count": sample.likes,
        "scraped_at": recent_timestamp(index, 120),
        "url": format!("https://www.youtube.com/watch?v={id}"),
        "platform": "youtube",
    })
}

fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..11].to_string()
}

/// Up to `limit` sample records for `platform`; unknown platforms yield nothing.
pub fn get_mock_data(platform: &str, limit: usize) -> Vec<ContentItem> {
    match platform.parse::<Platform>() {
        Ok(platform) => mock_content(platform, limit),
        Err(_) => {
            tracing::debug!(platform, "No mock content for platform");
            Vec::new()
        }
    }
}

pub fn mock_content(platform: Platform, limit: usize) -> Vec<ContentItem> {
    let values: Vec<Value> = match platform {
        Platform::Reddit => REDDIT_SAMPLES
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, s)| reddit_item(i, s))
            .collect(),
        Platform::TikTok => TIKTOK_SAMPLES
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, s)| tiktok_item(i, s))
            .collect(),
        Platform::YouTube => YOUTUBE_SAMPLES
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, s)| youtube_item(i, s))
            .collect(),
    };
    values.into_iter().filter_map(ContentItem::from_value).collect()
}

/// Number of sample records available for `platform`.
pub fn sample_count(platform: Platform) -> usize {
    match platform {
        Platform::Reddit => REDDIT_SAMPLES.len(),
        Platform::TikTok => TIKTOK_SAMPLES.len(),
        Platform::YouTube => YOUTUBE_SAMPLES.len(),
    }
}
