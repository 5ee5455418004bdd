//! OpenAPI documentation
//!
//! Provides OpenAPI 3.0 specification and Swagger UI for the Waflow API.

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::json;

/// Create OpenAPI routes
pub fn create_openapi_routes() -> Router {
    Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(swagger_ui))
}

/// OpenAPI JSON specification endpoint
async fn openapi_json() -> impl IntoResponse {
    Json(get_openapi_spec())
}

/// Swagger UI HTML endpoint
async fn swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

/// Get the OpenAPI specification as JSON
fn get_openapi_spec() -> serde_json::Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Waflow API",
            "description": "REST API for the Waflow WhatsApp campaign messaging service.\n\nErrors use the envelope `{\"success\": false, \"error\": <code>, \"details\": <message>}`.",
            "version": "1.0.0",
            "contact": {
                "name": "Waflow Team",
                "url": "https://github.com/example/waflow"
            },
            "license": {
                "name": "Apache-2.0",
                "url": "https://www.apache.org/licenses/LICENSE-2.0"
            }
        },
        "servers": [
            {
                "url": "/",
                "description": "This server"
            }
        ],
        "tags": [
            {"name": "health", "description": "Health check endpoints"},
            {"name": "campaigns", "description": "Campaign management"},
            {"name": "conversations", "description": "Conversation tracking"},
            {"name": "whatsapp", "description": "Template send path"},
            {"name": "webhooks", "description": "Provider callbacks"}
        ],
        "paths": {
            // Health endpoints
            "/health": {
                "get": {
                    "tags": ["health"],
                    "summary": "Basic health check",
                    "operationId": "health",
                    "responses": {
                        "200": {"description": "Service is healthy"}
                    }
                }
            },
            "/health/live": {
                "get": {
                    "tags": ["health"],
                    "summary": "Liveness probe",
                    "operationId": "liveness",
                    "responses": {
                        "200": {"description": "Service is alive"}
                    }
                }
            },
            "/health/ready": {
                "get": {
                    "tags": ["health"],
                    "summary": "Readiness probe",
                    "operationId": "readiness",
                    "responses": {
                        "200": {"description": "Service is ready"},
                        "503": {"description": "Service is not ready"}
                    }
                }
            },
            "/health/detailed": {
                "get": {
                    "tags": ["health"],
                    "summary": "Detailed health check",
                    "operationId": "healthDetailed",
                    "responses": {
                        "200": {"description": "Detailed health status"}
                    }
                }
            },
            // Campaign endpoints
            "/api/v1/campaigns": {
                "get": {
                    "tags": ["campaigns"],
                    "summary": "List campaigns",
                    "operationId": "listCampaigns",
                    "parameters": [
                        {"name": "status", "in": "query", "schema": {"type": "string", "enum": ["all", "scheduled", "running", "completed", "failed"]}},
                        {"name": "search", "in": "query", "schema": {"type": "string"}},
                        {"name": "limit", "in": "query", "schema": {"type": "integer", "default": 50}},
                        {"name": "offset", "in": "query", "schema": {"type": "integer", "default": 0}}
                    ],
                    "responses": {
                        "200": {
                            "description": "Paginated campaign list",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/CampaignPage"}
                                }
                            }
                        }
                    }
                },
                "post": {
                    "tags": ["campaigns"],
                    "summary": "Create a campaign",
                    "operationId": "createCampaign",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/CreateCampaignRequest"}
                            }
                        }
                    },
                    "responses": {
                        "201": {
                            "description": "Campaign created",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/Campaign"}
                                }
                            }
                        },
                        "400": {"description": "Missing required field"}
                    }
                },
                "put": {
                    "tags": ["campaigns"],
                    "summary": "Patch a campaign",
                    "description": "Updates status, metrics, and/or the contact list. A contacts patch replaces the stored list wholesale.",
                    "operationId": "updateCampaign",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/UpdateCampaignRequest"}
                            }
                        }
                    },
                    "responses": {
                        "200": {"description": "Patched campaign"},
                        "400": {"description": "Missing campaignId"},
                        "404": {"description": "Campaign not found"}
                    }
                }
            },
            "/api/v1/campaigns/{campaign_id}": {
                "get": {
                    "tags": ["campaigns"],
                    "summary": "Get a campaign",
                    "operationId": "getCampaign",
                    "parameters": [
                        {"name": "campaign_id", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "responses": {
                        "200": {"description": "Campaign details"},
                        "404": {"description": "Campaign not found"}
                    }
                }
            },
            // Conversation endpoints
            "/api/v1/conversations": {
                "get": {
                    "tags": ["conversations"],
                    "summary": "List conversations",
                    "operationId": "listConversations",
                    "parameters": [
                        {"name": "campaignId", "in": "query", "schema": {"type": "string"}},
                        {"name": "phone", "in": "query", "schema": {"type": "string"}},
                        {"name": "active", "in": "query", "schema": {"type": "boolean"}}
                    ],
                    "responses": {
                        "200": {
                            "description": "Conversations sorted by last activity",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": {"$ref": "#/components/schemas/Conversation"}
                                    }
                                }
                            }
                        }
                    }
                },
                "post": {
                    "tags": ["conversations"],
                    "summary": "Append a message",
                    "operationId": "appendMessage",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/AppendMessageRequest"}
                            }
                        }
                    },
                    "responses": {
                        "200": {"description": "Updated conversation"},
                        "400": {"description": "Missing required field"}
                    }
                },
                "put": {
                    "tags": ["conversations"],
                    "summary": "Update message status or activity",
                    "operationId": "updateConversation",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/UpdateConversationRequest"}
                            }
                        }
                    },
                    "responses": {
                        "200": {"description": "Updated conversation"},
                        "404": {"description": "Conversation not found"}
                    }
                }
            },
            "/api/v1/conversations/analytics": {
                "get": {
                    "tags": ["conversations"],
                    "summary": "Conversation analytics",
                    "operationId": "conversationAnalytics",
                    "parameters": [
                        {"name": "campaignId", "in": "query", "schema": {"type": "string"}}
                    ],
                    "responses": {
                        "200": {
                            "description": "Aggregates including response rate",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/ConversationAnalytics"}
                                }
                            }
                        }
                    }
                }
            },
            // Send path
            "/api/v1/whatsapp/send": {
                "post": {
                    "tags": ["whatsapp"],
                    "summary": "Send a template message",
                    "description": "Resolves the template, validates the parameter list against its placeholders, builds the provider payload, and submits it.",
                    "operationId": "sendMessage",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/SendMessageRequest"}
                            }
                        }
                    },
                    "responses": {
                        "200": {"description": "Message accepted by the provider"},
                        "400": {"description": "Validation or delivery failure"},
                        "404": {"description": "Template not found"}
                    }
                }
            },
            "/api/v1/whatsapp/templates/{name}": {
                "get": {
                    "tags": ["whatsapp"],
                    "summary": "Resolve a template",
                    "operationId": "getTemplate",
                    "parameters": [
                        {"name": "name", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "responses": {
                        "200": {"description": "Template and its parameter layout"},
                        "400": {"description": "Template not approved"},
                        "404": {"description": "Template not found"}
                    }
                }
            },
            // Webhook endpoints
            "/webhooks/whatsapp": {
                "get": {
                    "tags": ["webhooks"],
                    "summary": "Subscription verification handshake",
                    "operationId": "verifyWebhook",
                    "parameters": [
                        {"name": "hub.mode", "in": "query", "schema": {"type": "string"}},
                        {"name": "hub.verify_token", "in": "query", "schema": {"type": "string"}},
                        {"name": "hub.challenge", "in": "query", "schema": {"type": "string"}}
                    ],
                    "responses": {
                        "200": {"description": "Challenge echoed back"},
                        "403": {"description": "Token mismatch"}
                    }
                },
                "post": {
                    "tags": ["webhooks"],
                    "summary": "Provider callback intake",
                    "description": "Delivery-status transitions and inbound messages. Always answers 200 with a processing summary for a parseable, authentic body.",
                    "operationId": "receiveWebhook",
                    "responses": {
                        "200": {"description": "Processing summary with running statistics"},
                        "400": {"description": "Malformed JSON body"},
                        "403": {"description": "Signature mismatch"}
                    }
                }
            },
            "/webhooks/whatsapp/stats": {
                "get": {
                    "tags": ["webhooks"],
                    "summary": "Webhook processing statistics",
                    "operationId": "webhookStats",
                    "responses": {
                        "200": {"description": "Process-lifetime counters"}
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Campaign": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string"},
                        "name": {"type": "string"},
                        "templateName": {"type": "string"},
                        "status": {"type": "string", "enum": ["scheduled", "running", "completed", "failed"]},
                        "totalContacts": {"type": "integer"},
                        "sentCount": {"type": "integer"},
                        "deliveredCount": {"type": "integer"},
                        "readCount": {"type": "integer"},
                        "failedCount": {"type": "integer"},
                        "duplicateCount": {"type": "integer"},
                        "clickCount": {"type": "integer"},
                        "ctr": {"type": "number"},
                        "estimatedCost": {"type": "number"},
                        "createdAt": {"type": "string", "format": "date-time"},
                        "startedAt": {"type": "string", "format": "date-time"},
                        "completedAt": {"type": "string", "format": "date-time"},
                        "contacts": {
                            "type": "array",
                            "items": {"$ref": "#/components/schemas/Contact"}
                        }
                    }
                },
                "Contact": {
                    "type": "object",
                    "required": ["phone"],
                    "properties": {
                        "phone": {"type": "string"},
                        "name": {"type": "string"},
                        "status": {"type": "string", "enum": ["sent", "delivered", "read", "failed", "duplicate"]},
                        "messageId": {"type": "string"},
                        "sentAt": {"type": "string", "format": "date-time"},
                        "deliveredAt": {"type": "string", "format": "date-time"},
                        "readAt": {"type": "string", "format": "date-time"},
                        "failedAt": {"type": "string", "format": "date-time"},
                        "errorMessage": {"type": "string"},
                        "retryCount": {"type": "integer"}
                    }
                },
                "CampaignPage": {
                    "type": "object",
                    "properties": {
                        "campaigns": {
                            "type": "array",
                            "items": {"$ref": "#/components/schemas/Campaign"}
                        },
                        "total": {"type": "integer"},
                        "hasMore": {"type": "boolean"}
                    }
                },
                "CreateCampaignRequest": {
                    "type": "object",
                    "required": ["name", "templateName", "totalContacts"],
                    "properties": {
                        "id": {"type": "string"},
                        "name": {"type": "string"},
                        "templateName": {"type": "string"},
                        "totalContacts": {"type": "integer"},
                        "estimatedCost": {"type": "number", "description": "Defaults to totalContacts x 0.05"},
                        "contacts": {
                            "type": "array",
                            "items": {"$ref": "#/components/schemas/Contact"}
                        }
                    }
                },
                "UpdateCampaignRequest": {
                    "type": "object",
                    "required": ["campaignId"],
                    "properties": {
                        "campaignId": {"type": "string"},
                        "status": {"type": "string", "enum": ["scheduled", "running", "completed", "failed"]},
                        "metrics": {"type": "object"},
                        "contacts": {
                            "type": "array",
                            "items": {"$ref": "#/components/schemas/Contact"}
                        }
                    }
                },
                "Conversation": {
                    "type": "object",
                    "properties": {
                        "phone": {"type": "string"},
                        "campaignId": {"type": "string"},
                        "messages": {
                            "type": "array",
                            "items": {"$ref": "#/components/schemas/ConversationMessage"}
                        },
                        "lastActivity": {"type": "string", "format": "date-time"},
                        "isActive": {"type": "boolean"}
                    }
                },
                "ConversationMessage": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string"},
                        "content": {"type": "string"},
                        "type": {"type": "string", "enum": ["outgoing", "incoming"]},
                        "timestamp": {"type": "string", "format": "date-time"},
                        "status": {"type": "string"}
                    }
                },
                "AppendMessageRequest": {
                    "type": "object",
                    "required": ["phone", "messageId", "content", "type"],
                    "properties": {
                        "phone": {"type": "string"},
                        "campaignId": {"type": "string"},
                        "messageId": {"type": "string"},
                        "content": {"type": "string"},
                        "type": {"type": "string", "enum": ["outgoing", "incoming"]},
                        "status": {"type": "string"}
                    }
                },
                "UpdateConversationRequest": {
                    "type": "object",
                    "required": ["phone"],
                    "properties": {
                        "phone": {"type": "string"},
                        "campaignId": {"type": "string"},
                        "messageId": {"type": "string"},
                        "status": {"type": "string"},
                        "isActive": {"type": "boolean"}
                    }
                },
                "ConversationAnalytics": {
                    "type": "object",
                    "properties": {
                        "totalConversations": {"type": "integer"},
                        "activeConversations": {"type": "integer"},
                        "totalMessages": {"type": "integer"},
                        "incomingMessages": {"type": "integer"},
                        "outgoingMessages": {"type": "integer"},
                        "responseRate": {"type": "integer", "description": "Percentage of conversations with a reply"}
                    }
                },
                "SendMessageRequest": {
                    "type": "object",
                    "required": ["phone", "templateName"],
                    "properties": {
                        "phone": {"type": "string", "example": "919999999999"},
                        "templateName": {"type": "string", "example": "welcome_msg"},
                        "parameters": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Positional values for header then body placeholders"
                        },
                        "campaignId": {"type": "string"}
                    }
                },
                "ErrorResponse": {
                    "type": "object",
                    "properties": {
                        "success": {"type": "boolean", "example": false},
                        "error": {"type": "string", "example": "PARAMETER_COUNT_MISMATCH"},
                        "details": {"type": "string"}
                    }
                }
            }
        }
    })
}

/// Swagger UI HTML template
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Waflow API Documentation</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
    <style>
        body { margin: 0; padding: 0; }
        .swagger-ui .topbar { display: none; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            SwaggerUIBundle({
                url: "/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIBundle.SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>"#;
