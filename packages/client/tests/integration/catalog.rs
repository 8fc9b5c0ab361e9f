use ::common::{Id, MaterialType};
use client::{Dashboard, WeekCatalog, WeekPage};
use serde_json::json;

use crate::common::{TestEnv, routes};

#[tokio::test]
async fn catalog_sums_video_counts() {
    let env = TestEnv::spawn().await;
    env.seed(
        routes::THEME_WEEKS,
        json!({ "title": "Light", "videos_count": 3 }),
    );
    env.seed(
        routes::THEME_WEEKS,
        json!({ "title": "Sound", "videos_count": null }),
    );
    env.seed(
        routes::THEME_WEEKS,
        json!({ "title": "Motion", "videos_count": 5 }),
    );

    let catalog = WeekCatalog::load(&env.api).await.unwrap();

    assert_eq!(catalog.total_weeks(), 3);
    assert_eq!(catalog.total_videos(), 8);
    assert_eq!(catalog.latest().unwrap().title, "Motion");
}

#[tokio::test]
async fn week_page_shows_winners_first() {
    let env = TestEnv::spawn().await;
    let light = env.seed_week("Light");
    let sound = env.seed_week("Sound");
    env.seed_material("a", &light, false);
    env.seed_material("b", &light, true);
    env.seed_material("elsewhere", &sound, true);
    env.seed_material("c", &light, false);
    env.seed_material("d", &light, true);

    let page = WeekPage::load(&env.api, &light).await.unwrap();

    assert_eq!(page.week.title, "Light");
    let order: Vec<&str> = page.materials().iter().map(|m| m.title.as_str()).collect();
    assert_eq!(order, ["b", "d", "a", "c"]);
    assert_eq!(page.winners().count(), 2);
    assert_eq!(page.others().count(), 2);
}

#[tokio::test]
async fn week_page_keeps_materials_of_unknown_type() {
    let env = TestEnv::spawn().await;
    let light = env.seed_week("Light");
    env.seed_material("poster", &light, false);
    env.seed(
        routes::MATERIALS,
        json!({
            "title": "site",
            "student_name": "Aru",
            "material_type": "link",
            "url": "https://example.com/portfolio",
            "theme_week_id": light.as_str(),
        }),
    );

    let page = WeekPage::load(&env.api, &light).await.unwrap();

    assert_eq!(page.materials().len(), 2);
    assert_eq!(page.materials()[1].material_type, MaterialType::Other);
    assert_eq!(page.materials()[1].url, "https://example.com/portfolio");
}

#[tokio::test]
async fn missing_week_is_not_found() {
    let env = TestEnv::spawn().await;

    let err = WeekPage::load(&env.api, &Id::from("404")).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn dashboard_counts_every_collection() {
    let env = TestEnv::signed_in().await;
    let week = env.seed_week("Light");
    env.seed(routes::USERS, json!({ "username": "admin", "is_admin": true }));
    env.seed(
        routes::VIDEOS,
        json!({
            "title": "Intro",
            "student_name": "Aru",
            "youtube_url": "https://youtu.be/dQw4w9WgXcQ",
            "theme_week_id": week.as_str(),
        }),
    );
    env.seed_material("a", &week, true);
    env.seed_material("b", &week, false);

    let dashboard = Dashboard::load(&env.api).await.unwrap();

    assert_eq!(
        dashboard,
        Dashboard {
            users: 1,
            weeks: 1,
            videos: 1,
            materials: 2,
            winners: 1,
        }
    );
}

#[tokio::test]
async fn dashboard_needs_a_session() {
    let env = TestEnv::spawn().await;

    let err = Dashboard::load(&env.api).await.unwrap_err();

    assert!(err.is_auth_failure());
}
