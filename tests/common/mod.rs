use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use mealdesk_api::{
    config::AppConfig,
    db,
    entities::{
        client, client_department, client_diet, client_meal_type, contract, kitchen,
        kitchen_period, meal_entry, user,
    },
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};

/// Helper harness for spinning up an application state backed by an
/// in-memory SQLite database.
pub struct TestApp {
    pub state: AppState,
    router: Router,
    _event_task: tokio::task::JoinHandle<()>,
}

#[allow(dead_code)]
impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // A single pooled connection keeps the in-memory database alive and
        // shared across all queries of the test.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let db_arc = Arc::new(pool);
        let (tx, rx) = mpsc::channel(64);
        let event_sender = EventSender::new(tx);
        let event_task = tokio::spawn(events::process_events(rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", mealdesk_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            state,
            router,
            _event_task: event_task,
        }
    }

    /// Issue a request against the in-process router and decode the JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                builder.body(Body::from(json.to_string())).unwrap()
            }
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("parse response body")
        };

        (status, json)
    }

    pub async fn seed_client(&self, id: i64, name: &str) {
        client::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed client");
    }

    pub async fn seed_user(&self, id: i64, username: &str, display_name: &str) {
        user::ActiveModel {
            id: Set(id),
            username: Set(username.to_string()),
            display_name: Set(display_name.to_string()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed user");
    }

    pub async fn seed_kitchen(&self, id: i64, name: &str) {
        kitchen::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed kitchen");
    }

    pub async fn seed_client_department(&self, id: i64, client_id: i64, department_id: i64) {
        client_department::ActiveModel {
            id: Set(id),
            client_id: Set(client_id),
            department_id: Set(Some(department_id)),
            custom_name: Set(None),
            custom_short_name: Set(None),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed client department");
    }

    pub async fn seed_client_diet(&self, id: i64, client_id: i64, diet_id: i64) {
        client_diet::ActiveModel {
            id: Set(id),
            client_id: Set(client_id),
            diet_id: Set(Some(diet_id)),
            custom_name: Set(None),
            custom_short_name: Set(None),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed client diet");
    }

    pub async fn seed_client_meal_type(&self, id: i64, client_id: i64, meal_type_id: i64) {
        client_meal_type::ActiveModel {
            id: Set(id),
            client_id: Set(client_id),
            meal_type_id: Set(Some(meal_type_id)),
            custom_name: Set(None),
            custom_short_name: Set(None),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed client meal type");
    }

    pub async fn seed_contract(
        &self,
        id: i64,
        client_id: i64,
        status: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) {
        contract::ActiveModel {
            id: Set(id),
            client_id: Set(client_id),
            start_date: Set(start_date),
            end_date: Set(end_date),
            status: Set(status.to_string()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed contract");
    }

    pub async fn seed_kitchen_period(
        &self,
        id: i64,
        contract_id: i64,
        kitchen_id: i64,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) {
        kitchen_period::ActiveModel {
            id: Set(id),
            contract_id: Set(contract_id),
            kitchen_id: Set(kitchen_id),
            start_date: Set(start_date),
            end_date: Set(end_date),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed kitchen period");
    }

    /// Insert a ledger row. Returns the stored model with its generated id.
    #[allow(clippy::too_many_arguments)]
    pub async fn seed_entry(
        &self,
        key: EntryKey,
        quantity: i32,
        is_after_cutoff: bool,
        status: Option<&str>,
        cutoff_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> meal_entry::Model {
        meal_entry::ActiveModel {
            id: NotSet,
            meal_date: Set(key.meal_date),
            client_id: Set(key.client_id),
            department_id: Set(key.department_id),
            diet_id: Set(key.diet_id),
            meal_type_id: Set(key.meal_type_id),
            quantity: Set(quantity),
            is_after_cutoff: Set(is_after_cutoff),
            status: Set(status.map(str::to_string)),
            cutoff_at: Set(cutoff_at),
            updated_at: Set(updated_at),
            cutoff_decision_by: Set(None),
            cutoff_decision_at: Set(None),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed meal entry")
    }
}

/// Ledger key tuple used by the seed helpers.
#[derive(Debug, Clone, Copy)]
pub struct EntryKey {
    pub meal_date: NaiveDate,
    pub client_id: i64,
    pub department_id: i64,
    pub diet_id: i64,
    pub meal_type_id: i64,
}

#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[allow(dead_code)]
pub fn at(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(hour, minute, 0).unwrap())
}
