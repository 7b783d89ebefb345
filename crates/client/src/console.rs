//! The dashboard's action layer.
//!
//! [`Console`] is what screens call. Reads go through the [`QueryCache`];
//! writes are validated, sent through a [`Mutation`] handle, invalidate the
//! keys they affect, and publish a [`Notice`]. Deletes ask for confirmation
//! first and send nothing if it is refused.

use std::future::Future;
use std::sync::Arc;

use lunchdesk_core::forms::{
    ChangePasswordForm, ForgotPasswordForm, LocationForm, LoginForm, MealForm, ProfileForm,
    ResetPasswordForm,
};
use lunchdesk_core::{
    Ack, Customer, DashboardStats, Email, Location, LocationId, Meal, MealDay, MealId, Order,
    OrderId, OrderStatus, Page, Pager, Profile, UserId, ValidationError,
};
use tracing::{info, instrument};

use crate::cache::{Cached, QueryCache, QueryKey, QueryWatch};
use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ActionError, ApiError, MutationError};
use crate::mutation::Mutation;
use crate::notice::{Notice, Notices};
use crate::resources::OrderQuery;
use crate::session::{Session, SessionStore};

pub const CONFIRM_DELETE_LOCATION: &str = "Are you sure you want to delete this location?";
pub const CONFIRM_DELETE_MEAL: &str = "Are you sure you want to delete this meal?";
pub const CONFIRM_DELETE_USER: &str = "Are you sure you want to delete this user?";

const SIGNED_OUT: &str = "Logged out successfully";

/// Result of a delete action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The server deleted the record.
    Deleted(Ack),
    /// The user declined the confirmation; no request was sent.
    Cancelled,
}

/// One mutation handle per write operation.
#[derive(Debug)]
struct Mutations {
    sign_in: Mutation,
    create_location: Mutation,
    update_location: Mutation,
    toggle_location: Mutation,
    delete_location: Mutation,
    create_meal: Mutation,
    update_meal: Mutation,
    delete_meal: Mutation,
    delete_user: Mutation,
    update_order_status: Mutation,
    update_profile: Mutation,
    change_password: Mutation,
    send_otp: Mutation,
    resend_otp: Mutation,
    reset_password: Mutation,
}

impl Mutations {
    const fn new() -> Self {
        Self {
            sign_in: Mutation::new("sign_in", "Logged in successfully", "Invalid email or password"),
            create_location: Mutation::new(
                "create_location",
                "Location created successfully",
                "Failed to create location",
            ),
            update_location: Mutation::new(
                "update_location",
                "Location updated successfully",
                "Failed to update location",
            ),
            toggle_location: Mutation::new(
                "toggle_location",
                "Location status updated",
                "Failed to update location status",
            ),
            delete_location: Mutation::new(
                "delete_location",
                "Location deleted successfully",
                "Failed to delete location",
            ),
            create_meal: Mutation::new("create_meal", "Meal created successfully", "Failed to create meal"),
            update_meal: Mutation::new("update_meal", "Meal updated successfully", "Failed to update meal"),
            delete_meal: Mutation::new("delete_meal", "Meal deleted successfully", "Failed to delete meal"),
            delete_user: Mutation::new("delete_user", "User deleted successfully", "Failed to delete user"),
            update_order_status: Mutation::new(
                "update_order_status",
                "Order status updated",
                "Failed to update order status",
            ),
            update_profile: Mutation::new(
                "update_profile",
                "Profile updated successfully!",
                "Failed to update profile",
            ),
            change_password: Mutation::new(
                "change_password",
                "Password changed successfully!",
                "Failed to change password",
            ),
            send_otp: Mutation::new("send_otp", "OTP sent to your email successfully!", "Failed to send OTP"),
            resend_otp: Mutation::new("resend_otp", "OTP resent successfully!", "Failed to resend OTP"),
            reset_password: Mutation::new(
                "reset_password",
                "Password reset successfully!",
                "Failed to reset password",
            ),
        }
    }
}

/// Admin dashboard actions over one API client, cache and session.
///
/// Cloning is cheap; clones share the cache, session, notices and pending
/// state of every mutation.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    api: ApiClient,
    cache: QueryCache,
    notices: Notices,
    page_size: u32,
    mutations: Mutations,
}

impl Console {
    /// Build a console with a fresh session store and cache.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(config, SessionStore::new())?;
        Ok(Self::with_parts(api, QueryCache::from_config(config), config.page_size))
    }

    /// Build a console around an existing client and cache.
    #[must_use]
    pub fn with_parts(api: ApiClient, cache: QueryCache, page_size: u32) -> Self {
        Self {
            inner: Arc::new(ConsoleInner {
                api,
                cache,
                notices: Notices::new(),
                page_size: page_size.max(1),
                mutations: Mutations::new(),
            }),
        }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        self.inner.api.session()
    }

    #[must_use]
    pub fn notices(&self) -> &Notices {
        &self.inner.notices
    }

    /// A pager at page 1 with the configured page size.
    #[must_use]
    pub fn pager(&self) -> Pager {
        Pager::new(self.inner.page_size)
    }

    /// Subscribe to invalidations of a query key.
    #[must_use]
    pub fn watch(&self, key: QueryKey) -> QueryWatch {
        self.inner.cache.watch(key)
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Exchange credentials for a token and store the session.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] if validation fails or the server rejects the
    /// credentials.
    #[instrument(skip_all)]
    pub async fn sign_in(&self, form: LoginForm) -> Result<Arc<Session>, ActionError> {
        let request = self.check(form.validate())?;
        let api = self.api();
        let m = &self.inner.mutations.sign_in;
        let response = self.mutate(m, &[], api.login(&request)).await?;
        // Results cached under an earlier session must not leak into this one.
        self.inner.cache.clear().await;
        let session = self
            .session()
            .set(Session::from_login(request.email, response))
            .await;
        info!(display_name = %session.display_name, "Signed in");
        Ok(session)
    }

    /// Use a token obtained earlier instead of signing in.
    pub async fn resume(&self, session: Session) -> Arc<Session> {
        self.session().set(session).await
    }

    /// Drop the session and every cached result. Returns whether a session
    /// was present.
    pub async fn sign_out(&self) -> bool {
        let was_signed_in = self.session().clear().await;
        self.inner.cache.clear().await;
        if was_signed_in {
            self.inner.notices.publish(Notice::success(SIGNED_OUT));
        }
        was_signed_in
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// # Errors
    ///
    /// Returns [`ActionError::Query`] if the request fails.
    pub async fn dashboard_stats(&self) -> Result<Arc<DashboardStats>, ActionError> {
        let api = self.api();
        self.query(QueryKey::dashboard_stats(), "Failed to load dashboard", api.dashboard_stats())
            .await
    }

    /// # Errors
    ///
    /// Returns [`ActionError::Query`] if the request fails.
    pub async fn meals(&self, day: MealDay, pager: &Pager) -> Result<Arc<Page<Meal>>, ActionError> {
        let key = QueryKey::meals(day, pager.page(), pager.limit());
        let api = self.api();
        self.query(key, "Failed to load meals", api.list_meals(pager.page(), pager.limit(), Some(day)))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ActionError::Query`] if the request fails.
    pub async fn locations(&self, pager: &Pager) -> Result<Arc<Page<Location>>, ActionError> {
        let key = QueryKey::locations(pager.page(), pager.limit());
        let api = self.api();
        self.query(key, "Failed to load locations", api.list_locations(pager.page(), pager.limit()))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ActionError::Query`] if the request fails.
    pub async fn users(&self, pager: &Pager) -> Result<Arc<Page<Customer>>, ActionError> {
        let key = QueryKey::users(pager.page(), pager.limit());
        let api = self.api();
        self.query(key, "Failed to load users", api.list_users(pager.page(), pager.limit()))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ActionError::Query`] if the request fails.
    pub async fn user(&self, id: &UserId) -> Result<Arc<Customer>, ActionError> {
        let api = self.api();
        self.query(QueryKey::user(id), "Failed to load user", api.get_user(id))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ActionError::Query`] if the request fails.
    pub async fn orders(&self, query: &OrderQuery) -> Result<Arc<Page<Order>>, ActionError> {
        let api = self.api();
        self.query(QueryKey::orders(query), "Failed to load orders", api.list_orders(query))
            .await
    }

    // =========================================================================
    // Locations
    // =========================================================================

    /// # Errors
    ///
    /// Returns [`ActionError`] if validation or the request fails.
    pub async fn create_location(&self, form: &LocationForm) -> Result<Location, ActionError> {
        let input = self.check(form.validate())?;
        let api = self.api();
        self.mutate(
            &self.inner.mutations.create_location,
            &[QueryKey::all_locations()],
            api.create_location(&input),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns [`ActionError`] if validation or the request fails.
    pub async fn update_location(&self, id: &LocationId, form: &LocationForm) -> Result<Location, ActionError> {
        let input = self.check(form.validate())?;
        let api = self.api();
        self.mutate(
            &self.inner.mutations.update_location,
            &[QueryKey::all_locations()],
            api.update_location(id, &input),
        )
        .await
    }

    /// Flip a location's active flag. Only `isActive` is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] if the request fails.
    pub async fn toggle_location(&self, location: &Location) -> Result<Location, ActionError> {
        self.set_location_active(&location.id, !location.is_active).await
    }

    /// # Errors
    ///
    /// Returns [`ActionError`] if the request fails.
    pub async fn set_location_active(&self, id: &LocationId, is_active: bool) -> Result<Location, ActionError> {
        let api = self.api();
        self.mutate(
            &self.inner.mutations.toggle_location,
            &[QueryKey::all_locations()],
            api.set_location_status(id, is_active),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns [`ActionError`] if the request fails.
    pub async fn delete_location(
        &self,
        id: &LocationId,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<DeleteOutcome, ActionError> {
        if !confirm(CONFIRM_DELETE_LOCATION) {
            return Ok(DeleteOutcome::Cancelled);
        }
        let api = self.api();
        self.mutate(
            &self.inner.mutations.delete_location,
            &[QueryKey::all_locations()],
            api.delete_location(id),
        )
        .await
        .map(DeleteOutcome::Deleted)
    }

    // =========================================================================
    // Meals
    // =========================================================================

    /// # Errors
    ///
    /// Returns [`ActionError`] if validation or the request fails.
    pub async fn create_meal(&self, form: &MealForm) -> Result<Meal, ActionError> {
        let draft = self.check(form.validate())?;
        let api = self.api();
        self.mutate(
            &self.inner.mutations.create_meal,
            &[QueryKey::meals_for_day(draft.available_day)],
            api.create_meal(&draft),
        )
        .await
    }

    /// Update the meal `id`, currently listed under `listed_day`. That day
    /// and the form's day are both invalidated, so moving a meal to another
    /// day refreshes both lists.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] if validation or the request fails.
    pub async fn update_meal(
        &self,
        id: &MealId,
        listed_day: MealDay,
        form: &MealForm,
    ) -> Result<Meal, ActionError> {
        let draft = self.check(form.validate())?;
        let mut days = vec![QueryKey::meals_for_day(listed_day)];
        if draft.available_day != listed_day {
            days.push(QueryKey::meals_for_day(draft.available_day));
        }
        let api = self.api();
        self.mutate(&self.inner.mutations.update_meal, &days, api.update_meal(id, &draft))
            .await
    }

    /// Delete a meal listed under `day`. Only that day's lists are
    /// invalidated.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] if the request fails.
    pub async fn delete_meal(
        &self,
        id: &MealId,
        day: MealDay,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<DeleteOutcome, ActionError> {
        if !confirm(CONFIRM_DELETE_MEAL) {
            return Ok(DeleteOutcome::Cancelled);
        }
        let api = self.api();
        self.mutate(
            &self.inner.mutations.delete_meal,
            &[QueryKey::meals_for_day(day)],
            api.delete_meal(id),
        )
        .await
        .map(DeleteOutcome::Deleted)
    }

    // =========================================================================
    // Users and orders
    // =========================================================================

    /// # Errors
    ///
    /// Returns [`ActionError`] if the request fails.
    pub async fn delete_user(
        &self,
        id: &UserId,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<DeleteOutcome, ActionError> {
        if !confirm(CONFIRM_DELETE_USER) {
            return Ok(DeleteOutcome::Cancelled);
        }
        let api = self.api();
        self.mutate(
            &self.inner.mutations.delete_user,
            &[QueryKey::all_users()],
            api.delete_user(id),
        )
        .await
        .map(DeleteOutcome::Deleted)
    }

    /// # Errors
    ///
    /// Returns [`ActionError`] if the status is blank or the request fails.
    pub async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order, ActionError> {
        if status.is_blank() {
            return Err(self.reject(ValidationError::Required("Status")));
        }
        let api = self.api();
        self.mutate(
            &self.inner.mutations.update_order_status,
            &[QueryKey::all_orders()],
            api.update_order_status(id, status),
        )
        .await
    }

    // =========================================================================
    // Profile and passwords
    // =========================================================================

    /// # Errors
    ///
    /// Returns [`ActionError`] if validation or the request fails.
    pub async fn update_profile(&self, form: &ProfileForm) -> Result<Profile, ActionError> {
        let update = self.check(form.validate())?;
        let api = self.api();
        self.mutate(&self.inner.mutations.update_profile, &[], api.update_profile(&update))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ActionError`] if validation or the request fails.
    pub async fn change_password(&self, form: ChangePasswordForm) -> Result<Ack, ActionError> {
        let request = self.check(form.validate())?;
        let api = self.api();
        self.mutate(&self.inner.mutations.change_password, &[], api.change_password(&request))
            .await
    }

    /// Send a one-time password to the form's email. Returns the validated
    /// address, which the OTP and reset screens carry forward.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] if validation or the request fails.
    pub async fn request_password_reset(&self, form: &ForgotPasswordForm) -> Result<Email, ActionError> {
        let email = self.check(form.validate())?;
        let api = self.api();
        self.mutate(&self.inner.mutations.send_otp, &[], api.forgot_password(&email))
            .await?;
        Ok(email)
    }

    /// Send the one-time password again from the OTP screen.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] if the request fails.
    pub async fn resend_otp(&self, email: &Email) -> Result<Ack, ActionError> {
        let api = self.api();
        self.mutate(&self.inner.mutations.resend_otp, &[], api.forgot_password(email))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ActionError`] if validation or the request fails.
    pub async fn reset_password(&self, form: ResetPasswordForm) -> Result<Ack, ActionError> {
        let request = self.check(form.validate())?;
        let api = self.api();
        self.mutate(&self.inner.mutations.reset_password, &[], api.reset_password(&request))
            .await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    async fn query<T, F>(&self, key: QueryKey, fallback: &str, fetch: F) -> Result<Arc<T>, ActionError>
    where
        T: Cached,
        F: Future<Output = Result<T, ApiError>>,
    {
        match self.inner.cache.fetch(&key, fetch).await {
            Ok(value) => Ok(value),
            Err(source) => {
                self.forget_if_expired(&source).await;
                Err(ActionError::Query {
                    message: source.user_message(fallback),
                    source,
                })
            }
        }
    }

    async fn mutate<T, F>(&self, mutation: &Mutation, invalidates: &[QueryKey], call: F) -> Result<T, ActionError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        match mutation.run(&self.inner.cache, invalidates, call).await {
            Ok((value, _)) => {
                self.inner
                    .notices
                    .publish(Notice::success(mutation.success_message()));
                Ok(value)
            }
            Err(err) => {
                if let MutationError::Failed { source, .. } = &err {
                    self.forget_if_expired(source).await;
                }
                self.inner.notices.publish(Notice::error(err.to_string()));
                Err(err.into())
            }
        }
    }

    /// A rejected token ends the session, and its cached results with it.
    async fn forget_if_expired(&self, error: &ApiError) {
        if error.is_unauthorized() {
            self.inner.cache.clear().await;
            info!("Session expired, cached queries dropped");
        }
    }

    /// Publish a validation failure and turn it into an [`ActionError`].
    fn reject(&self, err: ValidationError) -> ActionError {
        self.inner.notices.publish(Notice::error(err.to_string()));
        ActionError::Invalid(err)
    }

    fn check<T>(&self, result: Result<T, ValidationError>) -> Result<T, ActionError> {
        result.map_err(|err| self.reject(err))
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("api", &self.inner.api)
            .field("cache", &self.inner.cache)
            .field("page_size", &self.inner.page_size)
            .finish_non_exhaustive()
    }
}
