//! Newsfeed reach and engagement analytics.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::IntoEnumIterator;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ReportMeta;
use crate::domain::{NewsCategory, NewsPriority};
use crate::entities::news_item;
use crate::services::analytics::metrics;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NewsOverview {
    pub total_news: u64,
    pub total_reads: u64,
    pub avg_read_count: f64,
    pub total_clicks: u64,
    pub engagement_rate: f64,
    pub click_rate: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryEngagementEntry {
    pub category: String,
    pub count: u64,
    pub reads: u64,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ByPriority {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NewsDistribution {
    pub active_news: u64,
    pub expired_news: u64,
    pub auto_generated: u64,
    pub manual: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TopNewsEntry {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub reads: u64,
    pub clicks: u64,
    pub priority: String,
    pub published_date: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NewsEngagementSection {
    pub overview: NewsOverview,
    pub by_category: Vec<CategoryEngagementEntry>,
    pub by_priority: ByPriority,
    pub distribution: NewsDistribution,
    pub top_news: Vec<TopNewsEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NewsEngagementReport {
    pub news_engagement: NewsEngagementSection,
    pub meta: ReportMeta,
}

fn reads_of(item: &news_item::Model) -> u64 {
    item.read_count.max(0) as u64
}

fn clicks_of(item: &news_item::Model) -> u64 {
    item.click_count.max(0) as u64
}

pub fn shape_news_engagement(
    items: &[news_item::Model],
    total_customers: u64,
    now: DateTime<Utc>,
) -> NewsEngagementSection {
    let total_news = items.len() as u64;
    let total_reads: u64 = items.iter().map(reads_of).sum();
    let total_clicks: u64 = items.iter().map(clicks_of).sum();

    let overview = NewsOverview {
        total_news,
        total_reads,
        avg_read_count: if total_news == 0 {
            0.0
        } else {
            metrics::round2(total_reads as f64 / total_news as f64)
        },
        total_clicks,
        engagement_rate: metrics::percentage(total_reads, total_customers),
        click_rate: metrics::percentage(total_clicks, total_reads),
    };

    let by_category = NewsCategory::iter()
        .map(|category| {
            let of_category: Vec<&news_item::Model> = items
                .iter()
                .filter(|i| i.category.parse::<NewsCategory>() == Ok(category))
                .collect();
            let reads: u64 = of_category.iter().map(|i| reads_of(i)).sum();
            CategoryEngagementEntry {
                category: category.to_string(),
                count: of_category.len() as u64,
                reads,
                engagement_rate: metrics::percentage(reads, total_reads),
            }
        })
        .collect();

    let mut by_priority = ByPriority::default();
    for item in items {
        match item.priority.parse::<NewsPriority>() {
            Ok(NewsPriority::High) => by_priority.high += 1,
            Ok(NewsPriority::Medium) => by_priority.medium += 1,
            Ok(NewsPriority::Low) => by_priority.low += 1,
            Err(_) => {}
        }
    }

    let active_news = items
        .iter()
        .filter(|i| i.expires_at.map_or(true, |expires| expires >= now))
        .count() as u64;
    let auto_generated = items.iter().filter(|i| i.is_auto_generated).count() as u64;
    let distribution = NewsDistribution {
        active_news,
        expired_news: total_news - active_news,
        auto_generated,
        manual: total_news - auto_generated,
    };

    let mut ranked: Vec<&news_item::Model> = items.iter().collect();
    ranked.sort_by(|a, b| {
        clicks_of(b)
            .cmp(&clicks_of(a))
            .then_with(|| a.id.cmp(&b.id))
    });
    let top_news = ranked
        .into_iter()
        .take(5)
        .map(|item| TopNewsEntry {
            id: item.id,
            title: item.title.clone(),
            category: item.category.clone(),
            reads: reads_of(item),
            clicks: clicks_of(item),
            priority: item.priority.clone(),
            published_date: item.published_at.date_naive().format("%Y-%m-%d").to_string(),
        })
        .collect();

    NewsEngagementSection {
        overview,
        by_category,
        by_priority,
        distribution,
        top_news,
    }
}
