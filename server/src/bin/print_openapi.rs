use utoipa::OpenApi;

use vellum::openapi::ApiDoc;

fn main() {
    println!(
        "{}",
        ApiDoc::openapi()
            .to_pretty_json()
            .expect("openapi doc serializes to json")
    );
}
