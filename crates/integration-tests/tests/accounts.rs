//! Users, orders, profile settings and the password flows.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use lunchdesk_client::{DeleteOutcome, NoticeLevel, OrderQuery, QueryKey};
use lunchdesk_core::forms::{ChangePasswordForm, ForgotPasswordForm, ProfileForm, ResetPasswordForm};
use lunchdesk_core::{OrderId, OrderStatus, OtpInput, UserId, ValidationError};
use lunchdesk_integration_tests::{ADMIN_EMAIL, ADMIN_PASSWORD, MockBackend, VALID_OTP};
use secrecy::SecretString;
use serde_json::json;

fn secret(value: &str) -> SecretString {
    SecretString::from(value)
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_user_detail_and_delete() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let pager = console.pager();

    let users = console.users(&pager).await.unwrap();
    assert_eq!(users.pagination().total, 3);
    let ana = users.items().iter().find(|u| u.name == "Ana Lopez").unwrap();
    assert_eq!(ana.pending_orders, 2);

    let detail = console.user(&ana.id).await.unwrap();
    assert_eq!(detail.email, "ana@example.com");
    assert!(console.cache().contains(&QueryKey::user(&ana.id)));

    let outcome = console.delete_user(&ana.id, |_| true).await.unwrap();
    assert!(matches!(outcome, DeleteOutcome::Deleted(_)));
    assert!(!console.cache().contains(&QueryKey::users(pager.page(), pager.limit())));
    assert!(!console.cache().contains(&QueryKey::user(&ana.id)));

    let err = console.user(&ana.id).await.unwrap_err();
    assert_eq!(err.to_string(), "User not found");
}

#[tokio::test]
async fn test_user_list_pages() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let mut pager = lunchdesk_core::Pager::new(2);

    let first = console.users(&pager).await.unwrap();
    assert_eq!(first.items().len(), 2);
    assert_eq!(first.pagination().pages, 2);

    assert!(pager.next(first.pagination()));
    let second = console.users(&pager).await.unwrap();
    assert_eq!(second.items().len(), 1);
    assert!(!pager.next(second.pagination()));

    let requests = backend.requests_to("GET", "/admin/users");
    assert_eq!(requests[1].param("page").as_deref(), Some("2"));
    assert_eq!(requests[1].param("limit").as_deref(), Some("2"));
}

#[tokio::test]
async fn test_declined_user_delete_sends_nothing() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let id = UserId::new(backend.ids("users")[0].clone());

    let outcome = console.delete_user(&id, |_| false).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(backend.count("DELETE", &format!("/admin/users/{id}")), 0);
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_orders_keep_unknown_fields_and_filters() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;

    let mut query = OrderQuery::new(10);
    query.status = Some(OrderStatus::new("pending"));
    query.filter = Some("  ".to_string());
    let orders = console.orders(&query).await.unwrap();

    assert_eq!(orders.items().len(), 1);
    let order = &orders.items()[0];
    assert_eq!(order.status.as_str(), "pending");
    assert_eq!(order.details["customerName"], "Ana Lopez");
    assert_eq!(order.details["items"][0]["quantity"], 1);

    let request = &backend.requests_to("GET", "/admin/orders")[0];
    assert_eq!(request.param("status").as_deref(), Some("pending"));
    assert_eq!(request.param("filter"), None);
}

#[tokio::test]
async fn test_status_update_invalidates_every_order_list() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;

    let all = OrderQuery::new(10);
    let mut pending = OrderQuery::new(10);
    pending.status = Some(OrderStatus::new("pending"));
    let orders = console.orders(&all).await.unwrap();
    console.orders(&pending).await.unwrap();
    let id: OrderId = orders.items()[0].id.clone();

    let updated = console
        .update_order_status(&id, OrderStatus::new("out_for_delivery"))
        .await
        .unwrap();

    assert_eq!(updated.status.as_str(), "out_for_delivery");
    assert_eq!(
        backend.requests_to("PUT", &format!("/admin/orders/{id}/status"))[0].json,
        Some(json!({ "status": "out_for_delivery" }))
    );
    assert!(!console.cache().contains(&QueryKey::orders(&all)));
    assert!(!console.cache().contains(&QueryKey::orders(&pending)));

    let pending_now = console.orders(&pending).await.unwrap();
    assert!(pending_now.is_empty());
}

// =============================================================================
// Profile
// =============================================================================

#[tokio::test]
async fn test_profile_update_omits_blank_fields() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let mut notices = console.notices().subscribe();

    let form = ProfileForm {
        name: "Dana Admin".to_string(),
        company_name: "Preissler's Lunch".to_string(),
        phone_number: "   ".to_string(),
        date_of_birth: "1990-04-01".to_string(),
        ..ProfileForm::default()
    };
    let profile = console.update_profile(&form).await.unwrap();

    assert_eq!(profile.name.as_deref(), Some("Dana Admin"));
    assert_eq!(profile.date_of_birth.as_deref(), Some("1990-04-01"));
    assert_eq!(profile.phone_number, None);
    assert_eq!(backend.profile().get("phoneNumber"), None);

    let put = &backend.requests_to("PUT", "/admin/profile")[0];
    assert!(put.content_type.as_deref().unwrap().starts_with("multipart/form-data"));
    assert_eq!(notices.recv().await.unwrap().message, "Profile updated successfully!");
}

#[tokio::test]
async fn test_profile_requires_name() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;

    let err = console.update_profile(&ProfileForm::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "Name is required");
    assert_eq!(backend.count("PUT", "/admin/profile"), 0);
}

// =============================================================================
// Passwords
// =============================================================================

#[tokio::test]
async fn test_change_password_with_wrong_current_password() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let mut notices = console.notices().subscribe();

    let err = console
        .change_password(ChangePasswordForm {
            current_password: secret("not-it"),
            new_password: secret("new-secret"),
            confirm_password: secret("new-secret"),
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Current password is incorrect");
    assert_eq!(backend.password(), ADMIN_PASSWORD);
    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_change_password() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;

    let ack = console
        .change_password(ChangePasswordForm {
            current_password: secret(ADMIN_PASSWORD),
            new_password: secret("new-secret"),
            confirm_password: secret("new-secret"),
        })
        .await
        .unwrap();

    assert_eq!(ack.success, Some(true));
    assert_eq!(backend.password(), "new-secret");
    assert_eq!(
        backend.requests_to("PUT", "/admin/change-password")[0].json,
        Some(json!({ "currentPassword": ADMIN_PASSWORD, "newPassword": "new-secret" }))
    );
}

#[tokio::test]
async fn test_mismatched_new_passwords_never_reach_the_server() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;

    let err = console
        .change_password(ChangePasswordForm {
            current_password: secret(ADMIN_PASSWORD),
            new_password: secret("new-secret"),
            confirm_password: secret("new-secrat"),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        lunchdesk_client::ActionError::Invalid(ValidationError::NewPasswordMismatch)
    ));
    assert_eq!(backend.count("PUT", "/admin/change-password"), 0);
}

#[tokio::test]
async fn test_forgot_and_reset_password_flow() {
    let backend = MockBackend::start().await;
    let console = backend.console();
    let mut notices = console.notices().subscribe();

    let email = console
        .request_password_reset(&ForgotPasswordForm {
            email: format!("  {ADMIN_EMAIL} "),
        })
        .await
        .unwrap();
    assert_eq!(email.as_str(), ADMIN_EMAIL);
    assert_eq!(
        notices.recv().await.unwrap().message,
        "OTP sent to your email successfully!"
    );

    console.resend_otp(&email).await.unwrap();
    assert_eq!(notices.recv().await.unwrap().message, "OTP resent successfully!");
    assert_eq!(backend.count("POST", "/auth/forgot-password"), 2);

    let mut otp = OtpInput::new();
    assert!(otp.paste(VALID_OTP));
    let code = otp.submit().unwrap();

    console
        .reset_password(ResetPasswordForm {
            email: email.to_string(),
            otp: code.as_str().to_string(),
            new_password: secret("fresh-pass"),
            confirm_password: secret("fresh-pass"),
        })
        .await
        .unwrap();

    assert_eq!(backend.password(), "fresh-pass");
    assert_eq!(
        backend.requests_to("POST", "/auth/reset-password")[0].json,
        Some(json!({ "email": ADMIN_EMAIL, "otp": VALID_OTP, "newPassword": "fresh-pass" }))
    );
}

#[tokio::test]
async fn test_wrong_otp_is_reported() {
    let backend = MockBackend::start().await;
    let console = backend.console();

    let err = console
        .reset_password(ResetPasswordForm {
            email: ADMIN_EMAIL.to_string(),
            otp: "654321".to_string(),
            new_password: secret("fresh-pass"),
            confirm_password: secret("fresh-pass"),
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid or expired OTP");
    assert_eq!(backend.password(), ADMIN_PASSWORD);
}

#[tokio::test]
async fn test_unknown_email_and_incomplete_otp() {
    let backend = MockBackend::start().await;
    let console = backend.console();

    let err = console
        .request_password_reset(&ForgotPasswordForm {
            email: "nobody@lunch.example".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Email not found");

    let err = console
        .reset_password(ResetPasswordForm {
            email: ADMIN_EMAIL.to_string(),
            otp: "123".to_string(),
            new_password: secret("fresh-pass"),
            confirm_password: secret("fresh-pass"),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        lunchdesk_client::ActionError::Invalid(ValidationError::IncompleteOtp)
    ));
    assert_eq!(backend.count("POST", "/auth/reset-password"), 0);
}
