use std::sync::{Arc, Mutex};

use ::common::config::UploadConfig;
use ::common::{MaterialType, ThemeWeek};
use client::{
    ClientError, EntityList, FormController, MaterialDraft, Materials, ProgressFn,
    ThemeWeekDraft, ThemeWeeks, UploadFile, UploadGateway, VideoDraft, Videos,
};
use reqwest::Client;

use crate::common::{TestEnv, routes};

fn material_form(env: &TestEnv, week: &str, kind: MaterialType) -> FormController<MaterialDraft> {
    let mut form = FormController::<MaterialDraft>::new().with_gateway(env.gateway.clone());
    form.set_field("title", "Poster").unwrap();
    form.set_field("student_name", "Aru").unwrap();
    form.set_field("theme_week_id", week).unwrap();
    form.set_field("material_type", kind.as_str()).unwrap();
    form
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn image_without_file_or_url_fails_before_any_request() {
        let env = TestEnv::signed_in().await;
        let mut materials = EntityList::<Materials>::admin(env.api.clone());
        let mut form = material_form(&env, "1", MaterialType::Image);

        let err = form.submit(&mut materials).await.unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(env.requests(), 0);
        assert_eq!(form.error(), Some("Choose a file to upload"));
        assert_eq!(form.draft().title, "Poster");
    }

    #[tokio::test]
    async fn missing_required_field_is_reported() {
        let env = TestEnv::signed_in().await;
        let mut videos = EntityList::<Videos>::admin(env.api.clone());
        let mut form = FormController::<VideoDraft>::new();
        form.set_field("title", "Intro").unwrap();

        let err = form.submit(&mut videos).await.unwrap_err();

        assert!(matches!(err, ClientError::Validation(ref m) if m == "Student name is required"));
        assert_eq!(env.requests(), 0);
        assert!(!form.is_submitting());
    }
}

mod upload {
    use super::*;

    #[tokio::test]
    async fn file_is_uploaded_before_the_material_is_created() {
        let env = TestEnv::signed_in().await;
        let week = env.seed_week("Light");
        let mut materials = EntityList::<Materials>::admin(env.api.clone());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress: ProgressFn = Arc::new(move |pct| sink.lock().unwrap().push(pct));

        let mut form = material_form(&env, week.as_str(), MaterialType::Image).on_progress(progress);
        form.select_file(UploadFile::new("poster.png", vec![7; 200 * 1024]));

        let created = form.submit(&mut materials).await.unwrap();

        assert_eq!(env.uploads(), 1);
        assert_eq!(created.url, "https://cdn.test/poster.png");
        assert_eq!(created.material_type, MaterialType::Image);
        assert!(!created.is_winner);
        assert_eq!(materials.items(), [created]);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");

        // Back to a blank form.
        assert_eq!(form.draft(), &MaterialDraft::default());
        assert!(form.file().is_none());
        assert!(form.error().is_none());
    }

    #[tokio::test]
    async fn youtube_material_skips_the_gateway() {
        let env = TestEnv::signed_in().await;
        let week = env.seed_week("Light");
        let mut materials = EntityList::<Materials>::admin(env.api.clone());

        let mut form = material_form(&env, week.as_str(), MaterialType::Youtube);
        form.set_field("url", "https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .unwrap();
        form.select_file(UploadFile::new("ignored.png", vec![1]));

        let created = form.submit(&mut materials).await.unwrap();

        assert_eq!(env.uploads(), 0);
        assert_eq!(created.url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn direct_url_skips_the_gateway() {
        let env = TestEnv::signed_in().await;
        let week = env.seed_week("Light");
        let mut materials = EntityList::<Materials>::admin(env.api.clone());

        let mut form = material_form(&env, week.as_str(), MaterialType::Pdf);
        form.set_field("url", "https://cdn.test/essay.pdf").unwrap();

        let created = form.submit(&mut materials).await.unwrap();

        assert_eq!(env.uploads(), 0);
        assert_eq!(created.url, "https://cdn.test/essay.pdf");
    }

    #[tokio::test]
    async fn failed_upload_aborts_the_create() {
        let env = TestEnv::signed_in().await;
        let week = env.seed_week("Light");
        let mut materials = EntityList::<Materials>::admin(env.api.clone());

        let gateway = UploadGateway::with_http(
            Client::new(),
            &UploadConfig {
                endpoint: env.gateway_endpoint(),
                preset: "wrong-preset".into(),
                ..UploadConfig::default()
            },
        );

        let mut form = material_form(&env, week.as_str(), MaterialType::Image).with_gateway(gateway);
        form.select_file(UploadFile::new("poster.png", vec![1, 2, 3]));

        let err = form.submit(&mut materials).await.unwrap_err();

        assert!(matches!(err, ClientError::Upload(ref m) if m.contains("Upload preset not found")));
        assert!(env.stored(routes::MATERIALS).is_empty());
        assert!(materials.is_empty());
        assert!(form.file().is_some());
        assert!(form.error().unwrap().starts_with("Upload failed"));
    }
}

mod submit {
    use super::*;

    #[tokio::test]
    async fn failed_create_keeps_the_draft() {
        let env = TestEnv::spawn().await;
        let mut videos = EntityList::<Videos>::admin(env.api.clone());

        let mut form = FormController::<VideoDraft>::new();
        form.set_field("title", "Intro").unwrap();
        form.set_field("student_name", "Aru").unwrap();
        form.set_field("youtube_url", "https://youtu.be/dQw4w9WgXcQ").unwrap();
        form.set_field("theme_week_id", "1").unwrap();
        let typed = form.draft().clone();

        let err = form.submit(&mut videos).await.unwrap_err();

        assert!(err.is_auth_failure());
        assert_eq!(form.draft(), &typed);
        assert!(form.error().is_some());
        assert!(!form.is_submitting());

        // Retry once signed in, without retyping.
        env.use_token(crate::common::ADMIN_TOKEN);
        let created = form.submit(&mut videos).await.unwrap();
        assert_eq!(created.title, "Intro");
        assert_eq!(created.theme_week_id, "1");
        assert_eq!(videos.len(), 1);
    }

    #[tokio::test]
    async fn new_week_gets_the_uploaded_image() {
        let env = TestEnv::signed_in().await;
        let mut weeks = EntityList::<ThemeWeeks>::admin(env.api.clone());

        let mut form = FormController::<ThemeWeekDraft>::new().with_gateway(env.gateway.clone());
        form.set_field("title", "Light").unwrap();
        form.set_field("start_date", "2024-03-01").unwrap();
        form.set_field("end_date", "2024-03-07").unwrap();
        form.set_field("result_url", "https://youtu.be/dQw4w9WgXcQ").unwrap();
        form.select_file(UploadFile::new("light.png", vec![3; 512]));

        let created = form.submit(&mut weeks).await.unwrap();

        assert_eq!(env.uploads(), 1);
        assert_eq!(created.image_url, "https://cdn.test/light.png");
        assert!(!created.id.is_empty());
        assert_eq!(weeks.items(), [created.clone()]);
        assert_eq!(env.stored(routes::THEME_WEEKS)[0]["image_url"], "https://cdn.test/light.png");
    }

    #[tokio::test]
    async fn edit_form_updates_the_week_in_place() {
        let env = TestEnv::signed_in().await;
        let light = env.seed_week("Light");
        env.seed_week("Sound");

        let mut weeks = EntityList::<ThemeWeeks>::admin(env.api.clone());
        weeks.load().await.unwrap();
        let week: ThemeWeek = weeks.get(&light).unwrap().clone();

        let mut form = FormController::<ThemeWeekDraft>::edit(&week).with_gateway(env.gateway.clone());
        assert_eq!(form.draft().title, "Light");
        form.set_field("title", "Light and shadow").unwrap();
        form.select_file(UploadFile::new("shadow.jpg", vec![9; 1024]));

        let updated = form.submit_edit(&light, &mut weeks).await.unwrap();

        assert_eq!(updated.title, "Light and shadow");
        assert_eq!(updated.image_url, "https://cdn.test/shadow.jpg");
        assert_eq!(weeks.get(&light).unwrap().title, "Light and shadow");
        assert_eq!(weeks.items()[1].title, "Sound");
        // The form resets to the values it was opened with.
        assert_eq!(form.draft().title, "Light");
    }
}
