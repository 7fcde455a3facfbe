mod support;

use chrono::{TimeZone, Utc};
use instructor_dashboard::api::Failure;
use instructor_dashboard::app::Message;
use instructor_dashboard::app::messages::{
    AnalyticsMessage, CourseField, CreateCourseMessage, LoginMessage, MyCoursesMessage,
    PlayerMessage, ProfileField, SettingsMessage,
};
use instructor_dashboard::app::state::Screen;
use instructor_dashboard::metrics;
use instructor_dashboard::models::{
    CourseDraft, CourseStatus, Credentials, NewAssessment, Question,
};
use instructor_dashboard::toast::ToastKind;
use serde_json::json;

use support::{Backend, MockServer, PASSWORD, TOKEN, app_for, course, png, progress};

fn toast_text(app: &instructor_dashboard::app::App) -> String {
    app.toast
        .current()
        .map(|t| t.message.clone())
        .unwrap_or_default()
}

#[tokio::test]
async fn login_admits_instructors_only() {
    let server = MockServer::start(Backend {
        role: "student".into(),
        ..Default::default()
    })
    .await;
    let mut app = app_for(&server, None);
    let credentials = Credentials {
        email: "ada@example.com".into(),
        password: PASSWORD.into(),
    };

    let response = app.ctx.api.login(&credentials).await.expect("login");
    let _ = app.update(Message::Login(LoginMessage::Finished(Ok(response))));
    assert!(!app.ctx.session.is_authenticated());
    assert_eq!(app.screen, Screen::Login);
    assert_eq!(
        toast_text(&app),
        "Access denied. Students are not allowed on this page."
    );

    server.state.lock().unwrap().role = "instructor".into();
    let response = app.ctx.api.login(&credentials).await.expect("login");
    let _ = app.update(Message::Login(LoginMessage::Finished(Ok(response))));
    assert_eq!(app.ctx.session.token().as_deref(), Some(TOKEN));
    assert_eq!(toast_text(&app), "Login successful! Redirecting...");

    let _ = app.update(Message::Login(LoginMessage::RedirectElapsed));
    assert_eq!(app.screen, Screen::Dashboard);
}

#[tokio::test]
async fn wrong_password_surfaces_server_message() {
    let server = MockServer::start(Backend::default()).await;
    let app = app_for(&server, None);
    let err = app
        .ctx
        .api
        .login(&Credentials {
            email: "ada@example.com".into(),
            password: "nope".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.message_or("Invalid credentials or server error."),
        "Invalid credentials"
    );
}

#[tokio::test]
async fn rejected_token_ends_the_session() {
    let server = MockServer::start(Backend::default()).await;
    let mut app = app_for(&server, Some("stale-token"));
    assert_eq!(app.screen, Screen::Dashboard);
    let session_file = app.ctx.settings.session_path();
    assert!(session_file.exists());

    let generation = app.my_courses.courses.begin();
    let result = app.ctx.api.courses(None).await.map_err(Failure::from);
    assert_eq!(result.as_ref().unwrap_err(), &Failure::Unauthorized);

    let _ = app.update(Message::MyCourses(MyCoursesMessage::Loaded(
        generation, result,
    )));
    assert_eq!(app.screen, Screen::Login);
    assert!(!app.ctx.session.is_authenticated());
    assert!(!session_file.exists());
    let toast = app.toast.current().expect("toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.starts_with("Session expired"));
}

#[tokio::test]
async fn navigation_without_token_stays_on_login() {
    let server = MockServer::start(Backend::default()).await;
    let mut app = app_for(&server, None);
    let _ = app.update(Message::Navigate(Screen::Analytics));
    assert_eq!(app.screen, Screen::Login);
}

#[tokio::test]
async fn failed_fetch_stops_loading_and_keeps_message() {
    let server = MockServer::start(Backend::default()).await;
    let mut app = app_for(&server, Some(TOKEN));

    let generation = app.player.course.begin();
    assert!(app.player.course.loading);
    let result = app
        .ctx
        .api
        .course("missing")
        .await
        .map_err(|e| Failure::with_fallback(e, "Failed to fetch course."));
    let _ = app.update(Message::Player(PlayerMessage::Loaded(generation, result)));

    assert!(!app.player.course.loading);
    assert_eq!(app.player.course.error.as_deref(), Some("Course not found"));
    assert!(app.player.course.data.is_none());
}

#[tokio::test]
async fn slow_response_does_not_overwrite_newer_one() {
    let server = MockServer::start(Backend {
        courses: vec![course("c1", "Rust Basics", 100.0, 10)],
        ..Default::default()
    })
    .await;
    let mut app = app_for(&server, Some(TOKEN));

    let stale = app.my_courses.courses.begin();
    let fresh = app.my_courses.courses.begin();
    let courses = app.ctx.api.courses(None).await.map_err(Failure::from);

    let _ = app.update(Message::MyCourses(MyCoursesMessage::Loaded(fresh, courses)));
    let _ = app.update(Message::MyCourses(MyCoursesMessage::Loaded(stale, Ok(vec![]))));

    assert_eq!(app.my_courses.courses.items().len(), 1);
    assert_eq!(app.my_courses.courses.items()[0].title, "Rust Basics");
    assert!(!app.my_courses.courses.loading);
}

#[tokio::test]
async fn created_course_can_be_fetched_back() {
    let server = MockServer::start(Backend::default()).await;
    let app = app_for(&server, Some(TOKEN));
    let draft = CourseDraft {
        title: "Async Rust".into(),
        description: "Futures, executors and pinning".into(),
        category: "Programming".into(),
        level: "intermediate".into(),
        duration: "12".into(),
        price: 49.0,
        learning_outcomes: vec!["Write async code".into()],
        ..Default::default()
    };

    let created = app.ctx.api.create_course(&draft).await.expect("create");
    let fetched = app.ctx.api.course(&created.id).await.expect("fetch");

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, "Async Rust");
    assert_eq!(fetched.price, 49.0);
    assert_eq!(fetched.category, "Programming");
    assert_eq!(fetched.status, CourseStatus::Draft);
    assert_eq!(fetched.learning_outcomes, vec!["Write async code".to_string()]);
    assert_eq!(fetched.duration, "12");
}

#[tokio::test]
async fn created_assessment_can_be_fetched_back() {
    let server = MockServer::start(Backend::default()).await;
    let app = app_for(&server, Some(TOKEN));
    let assessment = NewAssessment {
        title: "Ownership quiz".into(),
        description: "Borrowing rules".into(),
        due_date: Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap(),
        total_points: 20,
        passing_score: 12,
        time_limit: 30,
        is_published: false,
        questions: vec![Question {
            question: "What does &mut guarantee?".into(),
            points: 20,
        }],
    };

    let created = app
        .ctx
        .api
        .create_assessment("c1", &assessment)
        .await
        .expect("create");
    let fetched = app
        .ctx
        .api
        .assessment("c1", &created.id)
        .await
        .expect("fetch");

    assert_eq!(fetched.title, "Ownership quiz");
    assert_eq!(fetched.total_points, 20);
    assert_eq!(fetched.questions.len(), 1);
    assert_eq!(fetched.due_date, Some(assessment.due_date));
}

#[tokio::test]
async fn approving_a_certificate_removes_the_candidate() {
    let server = MockServer::start(Backend {
        courses: vec![
            course("c1", "Rust Basics", 100.0, 3),
            course("c2", "Async Rust", 90.0, 0),
            course("c3", "Embedded Rust", 120.0, 0),
        ],
        progress: vec![(
            "c1".into(),
            vec![
                progress("e1", "s1", "Ada Lovelace", 100.0),
                progress("e2", "s2", "Alan Turing", 100.0),
                progress("e3", "s3", "Grace Hopper", 80.0),
            ],
        )],
        ..Default::default()
    })
    .await;
    let mut app = app_for(&server, Some(TOKEN));

    let courses = app.ctx.api.courses(Some(30)).await.expect("courses");
    let generation = app.analytics.progress.begin();
    let overview = app
        .ctx
        .api
        .progress_overview(&courses)
        .await
        .map_err(Failure::from);
    let _ = app.update(Message::Analytics(AnalyticsMessage::ProgressLoaded(
        generation, overview,
    )));
    let candidates = &app.analytics.progress.get().expect("progress").candidates;
    assert_eq!(candidates.len(), 2);
    assert_eq!(app.analytics.progress.get().unwrap().completion_rate("c1"), 93);

    let _ = app.update(Message::Analytics(AnalyticsMessage::Approve("e1".into())));
    assert!(app.analytics.approving.contains("e1"));

    let candidate = app.analytics.progress.get().unwrap().candidates[0].clone();
    let result = app
        .ctx
        .api
        .issue_certificate(&candidate)
        .await
        .map_err(Failure::from);
    let _ = app.update(Message::Analytics(AnalyticsMessage::Approved(
        "e1".into(),
        result,
    )));

    let remaining = &app.analytics.progress.get().unwrap().candidates;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].enrollment_id, "e2");
    assert!(app.analytics.approving.is_empty());
    assert_eq!(
        app.analytics.toast.current().map(|t| t.message.as_str()),
        Some("Certificate approved for Ada Lovelace")
    );

    let issued = server.state.lock().unwrap().certificates.clone();
    assert_eq!(
        issued,
        vec![json!({ "studentId": "s1", "courseId": "c1", "enrollmentId": "e1" })]
    );
}

#[tokio::test]
async fn revenue_falls_back_to_course_estimate() {
    let mut first = course("c1", "Rust Basics", 100.0, 5);
    first["discountPrice"] = json!(20.0);
    let mut second = course("c2", "Async Rust", 200.0, 10);
    second["discountPrice"] = json!(50.0);
    let server = MockServer::start(Backend {
        courses: vec![first, second],
        ..Default::default()
    })
    .await;
    let app = app_for(&server, Some(TOKEN));

    let courses = app.ctx.api.courses(Some(30)).await.expect("courses");
    let earnings = app.ctx.api.earnings(30).await.expect("earnings");
    assert_eq!(metrics::total_revenue(Some(&earnings), &courses), 1900.0);

    server.state.lock().unwrap().earnings = 2500.0;
    let earnings = app.ctx.api.earnings(30).await.expect("earnings");
    assert_eq!(metrics::total_revenue(Some(&earnings), &courses), 2500.0);
}

#[tokio::test]
async fn failed_delete_is_reconciled_by_refetch() {
    let server = MockServer::start(Backend {
        courses: vec![
            course("c1", "Rust Basics", 100.0, 10),
            course("c2", "Async Rust", 90.0, 10),
        ],
        reject_edits: true,
        ..Default::default()
    })
    .await;
    let mut app = app_for(&server, Some(TOKEN));

    let generation = app.my_courses.courses.begin();
    let courses = app.ctx.api.courses(None).await.map_err(Failure::from);
    let _ = app.update(Message::MyCourses(MyCoursesMessage::Loaded(generation, courses)));

    let _ = app.update(Message::MyCourses(MyCoursesMessage::AskDelete("c1".into())));
    let _ = app.update(Message::MyCourses(MyCoursesMessage::ConfirmDelete));
    assert_eq!(app.my_courses.courses.items().len(), 1);
    assert!(app.my_courses.courses.is_patched());

    let result = app
        .ctx
        .api
        .delete_course("c1")
        .await
        .map_err(|e| Failure::with_fallback(e, "Failed to delete course."));
    let _ = app.update(Message::MyCourses(MyCoursesMessage::Deleted(result)));

    assert_eq!(toast_text(&app), "Course could not be deleted");
    assert!(app.my_courses.courses.loading);
    let refetch = app.my_courses.courses.generation();
    assert!(refetch > generation);

    let courses = app.ctx.api.courses(None).await.map_err(Failure::from);
    let _ = app.update(Message::MyCourses(MyCoursesMessage::Loaded(refetch, courses)));
    assert_eq!(app.my_courses.courses.items().len(), 2);
    assert!(!app.my_courses.courses.is_patched());
}

#[tokio::test]
async fn failed_status_change_with_empty_message_uses_fallback() {
    let server = MockServer::start(Backend {
        courses: vec![course("c1", "Rust Basics", 100.0, 10)],
        reject_edits: true,
        ..Default::default()
    })
    .await;
    let mut app = app_for(&server, Some(TOKEN));

    let generation = app.my_courses.courses.begin();
    let courses = app.ctx.api.courses(None).await.map_err(Failure::from);
    let _ = app.update(Message::MyCourses(MyCoursesMessage::Loaded(generation, courses)));

    let _ = app.update(Message::MyCourses(MyCoursesMessage::ToggleStatus("c1".into())));
    assert_eq!(app.my_courses.courses.items()[0].status, CourseStatus::Draft);

    let result = app
        .ctx
        .api
        .set_course_status("c1", CourseStatus::Draft)
        .await
        .map_err(|e| Failure::with_fallback(e, "Failed to update course status."));
    let _ = app.update(Message::MyCourses(MyCoursesMessage::StatusSaved(result)));
    assert_eq!(toast_text(&app), "Failed to update course status.");
    assert!(app.my_courses.courses.loading);
}

#[tokio::test]
async fn stale_unauthorized_reply_keeps_the_session() {
    let server = MockServer::start(Backend {
        courses: vec![course("c1", "Rust Basics", 100.0, 10)],
        ..Default::default()
    })
    .await;
    let mut app = app_for(&server, Some(TOKEN));

    let stale = app.my_courses.courses.begin();
    let fresh = app.my_courses.courses.begin();
    let courses = app.ctx.api.courses(None).await.map_err(Failure::from);
    let _ = app.update(Message::MyCourses(MyCoursesMessage::Loaded(fresh, courses)));
    let _ = app.update(Message::MyCourses(MyCoursesMessage::Loaded(
        stale,
        Err(Failure::Unauthorized),
    )));

    assert_eq!(app.screen, Screen::Dashboard);
    assert!(app.ctx.session.is_authenticated());
    assert_eq!(app.my_courses.courses.items().len(), 1);
    assert!(app.my_courses.courses.error.is_none());
}

#[tokio::test]
async fn old_session_reply_does_not_end_new_login() {
    let server = MockServer::start(Backend {
        role: "instructor".into(),
        ..Default::default()
    })
    .await;
    let mut app = app_for(&server, Some(TOKEN));
    let before_logout = app.instructor.begin();

    let _ = app.update(Message::LoggedOut(Ok(())));
    assert_eq!(app.screen, Screen::Login);

    let response = app
        .ctx
        .api
        .login(&Credentials {
            email: "ada@example.com".into(),
            password: PASSWORD.into(),
        })
        .await
        .expect("login");
    let _ = app.update(Message::Login(LoginMessage::Finished(Ok(response))));
    let _ = app.update(Message::Login(LoginMessage::RedirectElapsed));
    assert_eq!(app.screen, Screen::Dashboard);

    let _ = app.update(Message::InstructorLoaded(
        before_logout,
        Err(Failure::Unauthorized),
    ));
    assert_eq!(app.screen, Screen::Dashboard);
    assert_eq!(app.ctx.session.token().as_deref(), Some(TOKEN));

    let _ = app.update(Message::InstructorLoaded(
        app.instructor.generation(),
        Err(Failure::Unauthorized),
    ));
    assert_eq!(app.screen, Screen::Login);
    assert!(!app.ctx.session.is_authenticated());
}

#[tokio::test]
async fn logout_clears_the_session() {
    let server = MockServer::start(Backend::default()).await;
    let mut app = app_for(&server, Some(TOKEN));
    let session_file = app.ctx.settings.session_path();

    let _ = app.update(Message::Logout);
    assert!(app.ctx.session.is_authenticated());

    let result = app.ctx.api.logout().await.map_err(Failure::from);
    assert!(result.is_ok());
    let _ = app.update(Message::LoggedOut(result));

    assert_eq!(app.screen, Screen::Login);
    assert!(!app.ctx.session.is_authenticated());
    assert!(!session_file.exists());
    assert_eq!(toast_text(&app), "Logged out successfully.");
    assert_eq!(server.state.lock().unwrap().logouts, 1);
}

#[tokio::test]
async fn failed_logout_request_still_signs_out() {
    let server = MockServer::start(Backend::default()).await;
    let mut app = app_for(&server, Some(TOKEN));

    let _ = app.update(Message::LoggedOut(Err(Failure::Message(
        "Service unavailable".into(),
    ))));
    assert_eq!(app.screen, Screen::Login);
    assert!(!app.ctx.session.is_authenticated());
}

fn fill_course_form(app: &mut instructor_dashboard::app::App) {
    for (field, value) in [
        (CourseField::Title, "Async Rust"),
        (CourseField::Description, "Futures and executors"),
        (CourseField::Category, "Programming"),
        (CourseField::Level, "intermediate"),
        (CourseField::Price, "49"),
    ] {
        let _ = app.update(Message::CreateCourse(CreateCourseMessage::FieldChanged(
            field,
            value.into(),
        )));
    }
}

#[tokio::test]
async fn failed_thumbnail_keeps_course_and_still_redirects() {
    let server = MockServer::start(Backend {
        reject_uploads: true,
        ..Default::default()
    })
    .await;
    let mut app = app_for(&server, Some(TOKEN));
    let _ = app.update(Message::Navigate(Screen::CreateCourse));
    fill_course_form(&mut app);
    let _ = app.update(Message::CreateCourse(CreateCourseMessage::ThumbnailPicked(
        Ok(Some(png("cover.png"))),
    )));
    assert!(app.create_course.thumbnail.is_some());

    let _ = app.update(Message::CreateCourse(CreateCourseMessage::Submit));
    assert!(app.create_course.saving);
    let visit = app.create_course.visit;

    let draft = app.create_course.form.validate().expect("valid form");
    let created = app.ctx.api.create_course(&draft).await.map_err(Failure::from);
    let course_id = created.as_ref().expect("created").id.clone();
    let _ = app.update(Message::CreateCourse(CreateCourseMessage::Created(
        visit, created,
    )));
    assert_eq!(
        app.create_course.status.as_deref(),
        Some("Course created! Uploading thumbnail...")
    );
    assert!(app.create_course.thumbnail.is_none());

    let uploaded = app
        .ctx
        .api
        .upload_thumbnail(&course_id, png("cover.png"))
        .await
        .map_err(|e| Failure::with_fallback(e, "Failed to upload thumbnail."));
    assert_eq!(
        uploaded,
        Err(Failure::Message("Thumbnail upload failed".into()))
    );
    let _ = app.update(Message::CreateCourse(
        CreateCourseMessage::ThumbnailUploaded(visit, uploaded),
    ));
    assert_eq!(
        app.create_course.status.as_deref(),
        Some("Thumbnail upload failed Redirecting to courses page...")
    );
    assert_eq!(app.screen, Screen::CreateCourse);

    let stored = server.state.lock().unwrap().courses.clone();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["_id"], json!(course_id));

    let _ = app.update(Message::CreateCourse(CreateCourseMessage::RedirectElapsed(
        visit,
    )));
    assert_eq!(app.screen, Screen::MyCourses);
    assert_eq!(toast_text(&app), "Course created successfully!");
}

#[tokio::test]
async fn redirect_from_earlier_visit_leaves_new_form_alone() {
    let server = MockServer::start(Backend::default()).await;
    let mut app = app_for(&server, Some(TOKEN));

    let _ = app.update(Message::Navigate(Screen::CreateCourse));
    let first_visit = app.create_course.visit;
    let _ = app.update(Message::Navigate(Screen::Dashboard));
    let _ = app.update(Message::Navigate(Screen::CreateCourse));
    assert_ne!(app.create_course.visit, first_visit);
    fill_course_form(&mut app);

    let _ = app.update(Message::CreateCourse(CreateCourseMessage::RedirectElapsed(
        first_visit,
    )));
    assert_eq!(app.screen, Screen::CreateCourse);
    assert_eq!(app.create_course.form.title, "Async Rust");

    let late = app
        .ctx
        .api
        .create_course(&app.create_course.form.validate().expect("valid form"))
        .await
        .map_err(Failure::from);
    let _ = app.update(Message::CreateCourse(CreateCourseMessage::Created(
        first_visit,
        late,
    )));
    assert!(app.create_course.status.is_none());
}

#[tokio::test]
async fn profile_edit_with_avatar_reaches_backend() {
    let server = MockServer::start(Backend {
        profile: json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "bio": "",
            "expertise": ["Rust"],
            "avatar": null
        }),
        ..Default::default()
    })
    .await;
    let mut app = app_for(&server, Some(TOKEN));

    let generation = app.settings.profile.begin();
    let profile = app.ctx.api.profile().await.map_err(Failure::from);
    let _ = app.update(Message::Settings(SettingsMessage::ProfileLoaded(
        generation, profile,
    )));
    assert_eq!(app.settings.profile_form.first_name, "Ada");
    assert_eq!(app.settings.profile_form.expertise, vec!["Rust".to_string()]);
    assert!(app.settings.avatar_image.is_none());

    let _ = app.update(Message::Settings(SettingsMessage::Edit));
    let _ = app.update(Message::Settings(SettingsMessage::ProfileChanged(
        ProfileField::Bio,
        "Writes compilers".into(),
    )));
    let _ = app.update(Message::Settings(SettingsMessage::AvatarPicked(Ok(Some(
        png("me.png"),
    )))));
    assert!(app.settings.avatar_image.is_some());

    let _ = app.update(Message::Settings(SettingsMessage::SaveProfile));
    assert!(app.settings.saving);

    let (details, update) = app.settings.profile_form.validate().expect("valid profile");
    app.ctx.api.update_profile(&update).await.expect("profile");
    let saved = app
        .ctx
        .api
        .update_details(&details, app.settings.avatar.clone())
        .await
        .map_err(Failure::from);
    assert_eq!(
        saved.as_ref().ok().cloned().flatten().as_deref(),
        Some("https://cdn.example.com/avatars/me.png")
    );
    let _ = app.update(Message::Settings(SettingsMessage::ProfileSaved(saved)));

    assert!(!app.settings.saving);
    assert!(!app.settings.editable);
    assert!(app.settings.avatar.is_none());
    assert_eq!(toast_text(&app), "Profile updated successfully!");
    let stored = server.state.lock().unwrap().profile.clone();
    assert_eq!(stored["bio"], json!("Writes compilers"));
    assert_eq!(stored["firstName"], json!("Ada"));
}
