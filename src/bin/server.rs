//! HTTP host exercising the core's data contract: POST a model + load case,
//! get back an `AnalysisResult`. This is an example client of the crate, not
//! part of its public API.

use axum::{
    extract::Json,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use frame_analysis::prelude::*;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct NodeData {
    name: String,
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Deserialize)]
struct MaterialData {
    name: String,
    e: f64,
    g: f64,
    nu: f64,
    rho: f64,
}

#[derive(Debug, Deserialize)]
struct SectionData {
    name: String,
    a: f64,
    iy: f64,
    iz: f64,
    j: f64,
}

#[derive(Debug, Deserialize)]
struct MemberData {
    name: String,
    i_node: String,
    j_node: String,
    material: String,
    section: String,
    #[serde(default)]
    rotation: f64,
}

#[derive(Debug, Deserialize)]
struct SupportData {
    node: String,
    dx: bool,
    dy: bool,
    dz: bool,
    rx: bool,
    ry: bool,
    rz: bool,
}

#[derive(Debug, Deserialize)]
struct NodeLoadData {
    node: String,
    fx: f64,
    fy: f64,
    fz: f64,
    #[serde(default)]
    mx: f64,
    #[serde(default)]
    my: f64,
    #[serde(default)]
    mz: f64,
}

#[derive(Debug, Deserialize)]
struct ModelData {
    nodes: Vec<NodeData>,
    materials: Vec<MaterialData>,
    sections: Vec<SectionData>,
    members: Vec<MemberData>,
    supports: Vec<SupportData>,
    #[serde(default)]
    node_loads: Vec<NodeLoadData>,
}

#[derive(Debug, Deserialize)]
struct AnalysisRequest {
    model: ModelData,
    #[serde(default = "default_case")]
    case: String,
}

fn default_case() -> String {
    "Case 1".to_string()
}

#[derive(Debug, Serialize)]
struct AnalysisResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<AnalysisResult>,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn build_model(data: ModelData, case: &str) -> Model {
    let mut model = Model::new();

    for mat in data.materials {
        model.add_material(&mat.name, Material::new(mat.e, mat.g, mat.nu, mat.rho));
    }
    for sec in data.sections {
        model.add_section(&sec.name, Section::new(sec.a, sec.iy, sec.iz, sec.j));
    }
    for node in data.nodes {
        model.add_node(&node.name, Node::new(node.x, node.y, node.z));
    }
    for member in data.members {
        let mut m = Member::new(&member.i_node, &member.j_node, &member.material, &member.section);
        m.rotation = member.rotation;
        model.add_member(&member.name, m);
    }
    for sup in data.supports {
        model.add_support(
            &sup.node,
            Support::with_restraints(sup.dx, sup.dy, sup.dz, sup.rx, sup.ry, sup.rz),
        );
    }
    for load in data.node_loads {
        model.add_node_load(&load.node, NodeLoad::new(load.fx, load.fy, load.fz, load.mx, load.my, load.mz, case));
    }

    model
}

async fn analyze(Json(request): Json<AnalysisRequest>) -> impl IntoResponse {
    let model = build_model(request.model, &request.case);
    let config = Config::default();

    match solve(&model, &request.case, &config) {
        Ok(result) => (
            StatusCode::OK,
            Json(AnalysisResponse {
                success: true,
                error: None,
                result: Some(result),
            }),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(AnalysisResponse {
                success: false,
                error: Some(e.to_string()),
                result: None,
            }),
        ),
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/analyze", post(analyze))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8086));
    println!("frame-analysis server listening on http://{addr}");
    println!("  Health check: GET  /health");
    println!("  Analysis:     POST /api/v1/analyze");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
