//! In-memory service clients for tests/dev.
//!
//! Each client keeps its state behind a mutex, records the calls the flows
//! make (ordering matters for the registration saga), and lets tests script
//! the next failure per method.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use shamsi_core::{DocumentId, Message, OrderId, ProductId, UserId};

use crate::auth::{AuthClient, IdentityUpdate, IdentityUser, RegisterRequest};
use crate::documents::{DocumentCategory, DocumentClient, DocumentReceipt, DocumentUpload};
use crate::error::{ServiceError, ServiceResult};
use crate::marketplace::{MarketplaceClient, Product};
use crate::orders::{OrderClient, OrderDraft, PlacedOrder};
use crate::profile::{ProfileClient, ProfileRecord, ProfileUpdate, VerificationStatus};

/// One-shot failure scripting, keyed by method name.
#[derive(Debug, Default)]
struct FailureScript {
    next: Mutex<HashMap<&'static str, ServiceError>>,
}

impl FailureScript {
    fn arm(&self, method: &'static str, error: ServiceError) {
        if let Ok(mut next) = self.next.lock() {
            next.insert(method, error);
        }
    }

    /// Consume and return the scripted failure for `method`, if any.
    fn take(&self, method: &'static str) -> Option<ServiceError> {
        self.next.lock().ok()?.remove(method)
    }
}

fn not_authenticated() -> ServiceError {
    ServiceError::new(
        "not_authenticated",
        Message::new("You are not signed in", "لم يتم تسجيل الدخول"),
    )
}

// ── auth ─────────────────────────────────────────────────────────────────────

/// The code every in-memory OTP send issues.
pub const TEST_OTP: &str = "123456";

#[derive(Debug, Default)]
struct AuthState {
    user: Option<IdentityUser>,
    /// (phone, code) of the most recent OTP send.
    pending_otp: Option<(String, String)>,
    otp_sends: Vec<String>,
}

/// In-memory auth service.
#[derive(Debug, Default)]
pub struct InMemoryAuthClient {
    state: Mutex<AuthState>,
    failures: FailureScript,
}

impl InMemoryAuthClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a signed-in user.
    pub fn with_user(user: IdentityUser) -> Self {
        let client = Self::default();
        if let Ok(mut state) = client.state.lock() {
            state.user = Some(user);
        }
        client
    }

    /// Script the next call to `method` ("register", "send_phone_otp",
    /// "verify_phone_otp", "update_current_user", ...) to fail.
    pub fn fail_next(&self, method: &'static str, error: ServiceError) {
        self.failures.arm(method, error);
    }

    /// Phones OTPs were sent to, in order.
    pub fn otp_sends(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.otp_sends.clone())
            .unwrap_or_default()
    }

    pub fn current(&self) -> Option<IdentityUser> {
        self.state.lock().ok().and_then(|s| s.user.clone())
    }
}

#[async_trait]
impl AuthClient for InMemoryAuthClient {
    async fn register(&self, request: RegisterRequest) -> ServiceResult<IdentityUser> {
        if let Some(err) = self.failures.take("register") {
            return Err(err);
        }
        let user = IdentityUser {
            id: UserId::new(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            phone_verified: false,
            role: request.role,
        };
        let mut state = self.state.lock().map_err(|_| ServiceError::generic())?;
        state.user = Some(user.clone());
        Ok(user)
    }

    async fn send_phone_otp(&self, full_phone: &str) -> ServiceResult<()> {
        if let Some(err) = self.failures.take("send_phone_otp") {
            return Err(err);
        }
        let mut state = self.state.lock().map_err(|_| ServiceError::generic())?;
        state.pending_otp = Some((full_phone.to_string(), TEST_OTP.to_string()));
        state.otp_sends.push(full_phone.to_string());
        Ok(())
    }

    async fn verify_phone_otp(&self, full_phone: &str, otp: &str) -> ServiceResult<()> {
        if let Some(err) = self.failures.take("verify_phone_otp") {
            return Err(err);
        }
        let mut state = self.state.lock().map_err(|_| ServiceError::generic())?;
        let matches = state
            .pending_otp
            .as_ref()
            .is_some_and(|(phone, code)| phone == full_phone && code == otp);
        if !matches {
            return Err(ServiceError::new(
                "invalid_otp",
                Message::new("Incorrect verification code", "رمز التحقق غير صحيح"),
            ));
        }
        state.pending_otp = None;
        if let Some(user) = state.user.as_mut() {
            user.phone_verified = true;
        }
        Ok(())
    }

    async fn current_user(&self) -> ServiceResult<IdentityUser> {
        if let Some(err) = self.failures.take("current_user") {
            return Err(err);
        }
        self.current().ok_or_else(not_authenticated)
    }

    async fn update_current_user(&self, update: IdentityUpdate) -> ServiceResult<IdentityUser> {
        if let Some(err) = self.failures.take("update_current_user") {
            return Err(err);
        }
        let mut state = self.state.lock().map_err(|_| ServiceError::generic())?;
        let user = state.user.as_mut().ok_or_else(not_authenticated)?;
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(phone) = update.phone {
            // A changed number is unverified until proven otherwise.
            if user.phone.as_deref() != Some(phone.as_str()) {
                user.phone_verified = false;
            }
            user.phone = Some(phone);
        }
        Ok(user.clone())
    }

    async fn refresh_user(&self) -> ServiceResult<IdentityUser> {
        if let Some(err) = self.failures.take("refresh_user") {
            return Err(err);
        }
        self.current().ok_or_else(not_authenticated)
    }
}

// ── profile ──────────────────────────────────────────────────────────────────

/// In-memory profile service.
#[derive(Debug, Default)]
pub struct InMemoryProfileClient {
    profile: Mutex<ProfileRecord>,
    created_for: Mutex<Vec<UserId>>,
    status: Mutex<Option<VerificationStatus>>,
    failures: FailureScript,
}

impl InMemoryProfileClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: ProfileRecord) -> Self {
        let client = Self::default();
        if let Ok(mut p) = client.profile.lock() {
            *p = profile;
        }
        client
    }

    pub fn fail_next(&self, method: &'static str, error: ServiceError) {
        self.failures.arm(method, error);
    }

    /// Users a profile was created for, in order.
    pub fn created_for(&self) -> Vec<UserId> {
        self.created_for
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    pub fn stored(&self) -> ProfileRecord {
        self.profile.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn set_status(&self, status: VerificationStatus) {
        if let Ok(mut s) = self.status.lock() {
            *s = Some(status);
        }
    }
}

fn apply_update(profile: &mut ProfileRecord, update: ProfileUpdate) {
    macro_rules! set {
        ($field:ident) => {
            if let Some(value) = update.$field {
                profile.$field = value;
            }
        };
    }
    set!(region);
    set!(city);
    set!(district);
    set!(street);
    set!(postal_code);
    set!(property_type);
    set!(property_ownership);
    set!(roof_size);
    set!(electricity_bill);
    set!(employment_status);
    set!(employer);
    set!(job_title);
    set!(monthly_income);
    set!(preferred_language);
    set!(marketing_opt_in);
}

#[async_trait]
impl ProfileClient for InMemoryProfileClient {
    async fn get_profile(&self) -> ServiceResult<ProfileRecord> {
        if let Some(err) = self.failures.take("get_profile") {
            return Err(err);
        }
        Ok(self.stored())
    }

    async fn create_profile(&self, user_id: UserId, update: ProfileUpdate) -> ServiceResult<()> {
        if let Some(err) = self.failures.take("create_profile") {
            return Err(err);
        }
        if let Ok(mut created) = self.created_for.lock() {
            created.push(user_id);
        }
        let mut profile = self.profile.lock().map_err(|_| ServiceError::generic())?;
        apply_update(&mut profile, update);
        Ok(())
    }

    async fn update_profile(&self, update: ProfileUpdate) -> ServiceResult<()> {
        if let Some(err) = self.failures.take("update_profile") {
            return Err(err);
        }
        let mut profile = self.profile.lock().map_err(|_| ServiceError::generic())?;
        apply_update(&mut profile, update);
        Ok(())
    }

    async fn verification_status(&self, _user_id: UserId) -> ServiceResult<VerificationStatus> {
        if let Some(err) = self.failures.take("verification_status") {
            return Err(err);
        }
        let status = self.status.lock().map_err(|_| ServiceError::generic())?;
        Ok(status.unwrap_or(VerificationStatus::Unverified))
    }
}

// ── marketplace ──────────────────────────────────────────────────────────────

/// In-memory product catalog.
#[derive(Debug, Default)]
pub struct InMemoryMarketplaceClient {
    products: Mutex<BTreeMap<ProductId, Product>>,
}

impl InMemoryMarketplaceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product: Product) {
        if let Ok(mut products) = self.products.lock() {
            products.insert(product.id, product);
        }
    }
}

#[async_trait]
impl MarketplaceClient for InMemoryMarketplaceClient {
    async fn product_by_id(&self, id: ProductId) -> ServiceResult<Product> {
        let products = self.products.lock().map_err(|_| ServiceError::generic())?;
        products.get(&id).cloned().ok_or_else(|| {
            ServiceError::new(
                "product_not_found",
                Message::new("Product not found", "المنتج غير موجود"),
            )
        })
    }
}

// ── documents ────────────────────────────────────────────────────────────────

/// In-memory document service.
#[derive(Debug, Default)]
pub struct InMemoryDocumentClient {
    uploads: Mutex<Vec<DocumentUpload>>,
    failing_categories: Mutex<BTreeSet<DocumentCategory>>,
}

impl InMemoryDocumentClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upload for `category` fail.
    pub fn fail_category(&self, category: DocumentCategory) {
        if let Ok(mut failing) = self.failing_categories.lock() {
            failing.insert(category);
        }
    }

    /// Successfully stored uploads, in order.
    pub fn uploads(&self) -> Vec<DocumentUpload> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DocumentClient for InMemoryDocumentClient {
    async fn upload_document(&self, upload: DocumentUpload) -> ServiceResult<DocumentReceipt> {
        let failing = self
            .failing_categories
            .lock()
            .map_err(|_| ServiceError::generic())?;
        if failing.contains(&upload.category) {
            return Err(ServiceError::new(
                "upload_failed",
                Message::new("Document upload failed", "فشل رفع المستند"),
            ));
        }
        drop(failing);

        let mut uploads = self.uploads.lock().map_err(|_| ServiceError::generic())?;
        uploads.push(upload);
        Ok(DocumentReceipt {
            document_id: DocumentId::new(),
        })
    }
}

// ── orders ───────────────────────────────────────────────────────────────────

/// In-memory order service.
#[derive(Debug, Default)]
pub struct InMemoryOrderClient {
    placed: Mutex<Vec<OrderDraft>>,
    failures: FailureScript,
}

impl InMemoryOrderClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, method: &'static str, error: ServiceError) {
        self.failures.arm(method, error);
    }

    /// Drafts accepted so far, in order.
    pub fn placed(&self) -> Vec<OrderDraft> {
        self.placed.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl OrderClient for InMemoryOrderClient {
    async fn place_order(&self, draft: OrderDraft) -> ServiceResult<PlacedOrder> {
        if let Some(err) = self.failures.take("place_order") {
            return Err(err);
        }
        let mut placed = self.placed.lock().map_err(|_| ServiceError::generic())?;
        placed.push(draft);
        Ok(PlacedOrder {
            order_id: OrderId::new(),
            placed_at: chrono::Utc::now(),
        })
    }
}
