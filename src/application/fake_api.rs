// In-memory console backend for tests
use crate::application::console_api::{ApiFault, ConsoleApi, HttpMethod};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use tokio::sync::Notify;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: String,
    pub method: HttpMethod,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Backend {
    business_configs: Map<String, Value>,
    system_config: Option<Value>,
    instance_configs: Map<String, Value>,
    instances: BTreeMap<String, Value>,
    plugins: Vec<String>,
    items: Vec<Value>,
    cluster: Value,
    faults: HashMap<String, ApiFault>,
    overrides: HashMap<String, Value>,
    stalled: HashSet<String>,
    calls: Vec<RecordedCall>,
}

pub struct FakeConsoleApi {
    backend: Mutex<Backend>,
    released: Notify,
}

impl FakeConsoleApi {
    pub fn seeded() -> Self {
        let mut backend = Backend {
            system_config: Some(json!({
                "server": {"port": 6379, "bind": "0.0.0.0", "max_connections": 10000},
                "storage": {"data_dir": "./data", "write_buffer_size": 67108864}
            })),
            plugins: vec![
                "compression-lz4".to_string(),
                "metrics-exporter".to_string(),
                "replication".to_string(),
            ],
            cluster: json!({
                "status": "online",
                "leader": "node-1",
                "nodes": [
                    {"id": "node-1", "address": "10.0.0.1:6379", "status": "online", "last_active": 1700000000000i64},
                    {"id": "node-2", "address": "10.0.0.2:6379", "status": "offline"}
                ]
            }),
            ..Backend::default()
        };

        for biz_type in ["market", "stock", "trade"] {
            backend.business_configs.insert(
                biz_type.to_string(),
                json!({"name": biz_type, "block_size": 60, "retention_days": 30, "compression": "lz4"}),
            );
        }
        for (id, biz_type, status) in [
            ("inst-a", "stock", "running"),
            ("inst-b", "market", "stopped"),
            ("inst-c", "trade", "running"),
        ] {
            backend.instances.insert(
                id.to_string(),
                json!({"type": biz_type, "status": status, "last_update": 1700000000, "data_points": 100}),
            );
        }
        for id in ["inst-a", "inst-b"] {
            backend
                .instance_configs
                .insert(id.to_string(), json!({"name": id, "business_type": "stock", "node_id": "node-1"}));
        }
        let symbols = ["AAPL", "MSFT", "GOOG"];
        let types = ["stock", "market", "trade"];
        for i in 0..23 {
            backend.items.push(json!({
                "timestamp": 1700000000000i64 + i as i64 * 1000,
                "value": i as f64,
                "tags": {"type": types[i % 3], "symbol": symbols[(i / 3) % 3]}
            }));
        }

        Self {
            backend: Mutex::new(backend),
            released: Notify::new(),
        }
    }

    /// Adds `count` more stopped instances named `bulk-NNN`.
    pub fn with_bulk_instances(self, count: usize) -> Self {
        {
            let mut backend = self.backend.lock().unwrap();
            for i in 0..count {
                backend
                    .instances
                    .insert(format!("bulk-{:03}", i), json!({"type": "stock", "status": "stopped"}));
            }
        }
        self
    }

    pub fn fail(&self, endpoint: &str, fault: ApiFault) {
        self.backend.lock().unwrap().faults.insert(endpoint.to_string(), fault);
    }

    pub fn recover(&self, endpoint: &str) {
        self.backend.lock().unwrap().faults.remove(endpoint);
    }

    pub fn respond_with(&self, endpoint: &str, payload: Value) {
        self.backend
            .lock()
            .unwrap()
            .overrides
            .insert(endpoint.to_string(), payload);
    }

    /// Calls to `endpoint` wait until [`FakeConsoleApi::release`] is called.
    pub fn stall(&self, endpoint: &str) {
        self.backend.lock().unwrap().stalled.insert(endpoint.to_string());
    }

    pub fn release(&self, endpoint: &str) {
        self.backend.lock().unwrap().stalled.remove(endpoint);
        self.released.notify_waiters();
    }

    fn is_stalled(&self, endpoint: &str) -> bool {
        self.backend.lock().unwrap().stalled.contains(endpoint)
    }

    pub fn remove_instance(&self, id: &str) {
        self.backend.lock().unwrap().instances.remove(id);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.backend.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls().iter().filter(|c| c.endpoint == endpoint).count()
    }

    pub fn clear_calls(&self) {
        self.backend.lock().unwrap().calls.clear();
    }
}

fn not_found() -> ApiFault {
    ApiFault::Status {
        status: 404,
        reason: "Not Found".to_string(),
    }
}

fn bad_request() -> ApiFault {
    ApiFault::Status {
        status: 400,
        reason: "Bad Request".to_string(),
    }
}

fn instance_id(body: &Option<Value>) -> Result<String, ApiFault> {
    body.as_ref()
        .and_then(|b| b.get("instance_id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(bad_request)
}

impl Backend {
    fn handle(&mut self, endpoint: &str, method: HttpMethod, body: Option<Value>) -> Result<Value, ApiFault> {
        match (method, endpoint) {
            (HttpMethod::Get, "/stats") => {
                let total: u64 = self
                    .instances
                    .values()
                    .filter_map(|i| i.get("data_points").and_then(Value::as_u64))
                    .sum();
                Ok(json!({"storage": {"total_points": total}}))
            }
            (HttpMethod::Get, "/metadata") => Ok(json!({
                "config_count": self.business_configs.len()
                    + self.instance_configs.len()
                    + usize::from(self.system_config.is_some()),
                "business_types": self.business_configs.keys().collect::<Vec<_>>()
            })),
            (HttpMethod::Get, "/config") => Ok(json!({
                "business_configs": self.business_configs,
                "system_config": self.system_config,
                "instance_configs": self.instance_configs
            })),
            (HttpMethod::Post, "/config/update") => {
                let body = body.ok_or_else(bad_request)?;
                let key = body.get("key").and_then(Value::as_str).ok_or_else(bad_request)?;
                let value = body.get("value").cloned().unwrap_or(Value::Null);
                match key.split_once(':') {
                    Some(("business", name)) => upsert(&mut self.business_configs, name, value),
                    Some(("instance", id)) => upsert(&mut self.instance_configs, id, value),
                    Some(("system", "main")) => {
                        self.system_config = (!value.is_null()).then_some(value);
                    }
                    _ => return Err(bad_request()),
                }
                Ok(json!({"ok": true}))
            }
            (HttpMethod::Get, "/cluster") => Ok(self.cluster.clone()),
            (HttpMethod::Get, "/business") => Ok(json!({
                "instances": self.instances,
                "plugins": self.plugins,
                "performance": {"write_rate": 1200.0, "query_rate": 300.0, "cache_hit_rate": 97.5}
            })),
            (HttpMethod::Get, "/business/data") => Ok(json!({"items": self.items})),
            (HttpMethod::Post, "/business/instance/create") => {
                let id = instance_id(&body)?;
                let business_type = body
                    .as_ref()
                    .and_then(|b| b.get("business_type"))
                    .cloned()
                    .unwrap_or(Value::Null);
                if self.instances.contains_key(&id) {
                    return Err(ApiFault::Status {
                        status: 409,
                        reason: "Conflict".to_string(),
                    });
                }
                self.instances
                    .insert(id, json!({"type": business_type, "status": "stopped", "data_points": 0}));
                Ok(json!({"ok": true}))
            }
            (HttpMethod::Post, "/business/instance/start" | "/business/instance/stop") => {
                let id = instance_id(&body)?;
                let status = if endpoint.ends_with("start") { "running" } else { "stopped" };
                let instance = self.instances.get_mut(&id).ok_or_else(not_found)?;
                instance["status"] = json!(status);
                Ok(json!({"ok": true}))
            }
            (HttpMethod::Post, "/business/instance/delete") => {
                let id = instance_id(&body)?;
                self.instances.remove(&id).ok_or_else(not_found)?;
                Ok(json!({"ok": true}))
            }
            _ => Err(not_found()),
        }
    }
}

fn upsert(map: &mut Map<String, Value>, key: &str, value: Value) {
    if value.is_null() {
        map.remove(key);
    } else {
        map.insert(key.to_string(), value);
    }
}

#[async_trait]
impl ConsoleApi for FakeConsoleApi {
    async fn call(&self, endpoint: &str, method: HttpMethod, body: Option<Value>) -> Result<Value, ApiFault> {
        loop {
            let released = self.released.notified();
            if !self.is_stalled(endpoint) {
                break;
            }
            released.await;
        }

        let mut backend = self.backend.lock().unwrap();
        backend.calls.push(RecordedCall {
            endpoint: endpoint.to_string(),
            method,
            body: body.clone(),
        });

        if let Some(fault) = backend.faults.get(endpoint) {
            return Err(fault.clone());
        }
        if let Some(payload) = backend.overrides.get(endpoint) {
            return Ok(payload.clone());
        }
        backend.handle(endpoint, method, body)
    }
}
