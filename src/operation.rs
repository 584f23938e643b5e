// The three operations the simulator can perform, and the request each one
// turns into. Payload strings are carried as-is; nothing here rewrites them.

use serde::Serialize;

/// HTTP method used by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Order fields sent to the order-creation endpoint. Mirrors the tool
/// schema the ordering agent uses.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OrderPayload {
    pub pizza_type: String,
    pub size: String,
    pub quantity: u32,
    pub customer_name: String,
    pub delivery_address: String,
    pub phone_number: String,
}

/// What goes on the wire alongside the URL. `Json` bodies are serialized
/// by the client straight from the order struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    None,
    Query(Vec<(String, String)>),
    Json(OrderPayload),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    FetchMenu,
    CreateOrder(OrderPayload),
    CheckStatus { order_id: String },
}

impl Operation {
    pub fn method(&self) -> Method {
        match self {
            Operation::FetchMenu | Operation::CheckStatus { .. } => Method::Get,
            Operation::CreateOrder(_) => Method::Post,
        }
    }

    pub fn payload(&self) -> Payload {
        match self {
            Operation::FetchMenu => Payload::None,
            Operation::CreateOrder(order) => Payload::Json(order.clone()),
            Operation::CheckStatus { order_id } => {
                Payload::Query(vec![("order_id".to_string(), order_id.clone())])
            }
        }
    }

    /// Short verb phrase used in error summaries ("Error creating order: ...").
    pub fn action(&self) -> &'static str {
        match self {
            Operation::FetchMenu => "fetching menu",
            Operation::CreateOrder(_) => "creating order",
            Operation::CheckStatus { .. } => "checking status",
        }
    }
}
