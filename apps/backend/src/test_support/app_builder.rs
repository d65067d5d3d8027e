//! Test service builder.
//! Given an AppState, build an initialized Actix **test service**.

use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::Error as ActixError;
use actix_web::{
    web::{self, ServiceConfig},
    App,
};

use crate::middleware::request_trace::RequestTrace;
use crate::state::app_state::AppState;

/// Function pointer for custom route configuration.
type RoutesFn = Box<dyn FnOnce(&mut ServiceConfig) + Send>;

pub fn create_test_app_builder(state: AppState) -> TestAppBuilder {
    TestAppBuilder {
        state,
        router: Router::Prod,
    }
}

enum Router {
    Prod,
    Custom(RoutesFn),
}

pub struct TestAppBuilder {
    state: AppState,
    router: Router,
}

impl TestAppBuilder {
    /// Use custom routes for a test.
    pub fn with_routes<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut ServiceConfig) + Send + 'static,
    {
        self.router = Router::Custom(Box::new(f));
        self
    }

    /// Build and initialize the Actix test service with request tracing.
    pub async fn build(
        self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = ActixError>
    {
        let app = App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(self.state.clone()));

        let app = match self.router {
            Router::Prod => app.configure(crate::routes::configure),
            Router::Custom(f) => app.configure(f),
        };

        actix_web::test::init_service(app).await
    }
}
