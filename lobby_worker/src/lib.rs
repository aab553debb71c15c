use serde_json::json;
use worker::*;

// Export the Durable Object from server_do
pub use server_do::MatchDO;

const CODE_LEN: usize = 5;
const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: worker::Context) -> Result<Response> {
    let router = Router::new();

    router
        .get_async("/", handle_index)
        .get_async("/create", handle_create)
        .get_async("/join/:code", handle_join)
        .run(req, env)
        .await
}

async fn handle_index(_req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    Response::from_json(&json!({
        "service": "cyberpong",
        "create": "/create",
        "join": "/join/:code?user=<id>",
    }))
}

async fn handle_create(_req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let code = generate_match_code();

    // Get DO stub by name (creates if doesn't exist)
    let match_do = ctx.env.durable_object("MATCH")?;
    let _stub = match_do.get_by_name(&code)?;

    console_log!("Lobby: Created match {}", code);
    Response::from_json(&json!({ "code": code }))
}

/// Forward the websocket upgrade to the match actor named by the code
async fn handle_join(req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let code = ctx.param("code").map_or("", |v| v).to_ascii_uppercase();

    if !is_valid_match_code(&code) {
        return Response::error("Invalid match code", 400);
    }

    let upgrade = req
        .headers()
        .get("Upgrade")?
        .unwrap_or_default()
        .to_ascii_lowercase();
    if upgrade != "websocket" {
        return Response::error("Expected WebSocket upgrade request", 426);
    }

    let match_do = ctx.env.durable_object("MATCH")?;
    let stub = match_do.get_by_name(&code)?;
    stub.fetch_with_request(req).await
}

/// Generate a random 5-character match code (A-Z, 0-9)
fn generate_match_code() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_CHARS.len());
            CODE_CHARS[idx] as char
        })
        .collect()
}

fn is_valid_match_code(code: &str) -> bool {
    code.len() == CODE_LEN && code.bytes().all(|b| CODE_CHARS.contains(&b))
}
