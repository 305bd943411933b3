//! Backend command names, grouped by namespace

pub const AGENTS_LIST: &str = "agents.list";
pub const AGENTS_GET: &str = "agents.get";
pub const AGENTS_CREATE: &str = "agents.create";
pub const AGENTS_CONFIGURE: &str = "agents.configure";
pub const AGENTS_TRAIN_SKILL: &str = "agents.train_skill";

pub const SWARM_LIST: &str = "swarm.list";
pub const SWARM_CREATE: &str = "swarm.create";
pub const SWARM_CONSENSUS: &str = "swarm.consensus";
pub const SWARM_VOTE: &str = "swarm.vote";

pub const WALLET_LIST: &str = "wallet.list";
pub const WALLET_BALANCE: &str = "wallet.balance";
pub const WALLET_CREATE: &str = "wallet.create";
pub const WALLET_CONNECT: &str = "wallet.connect";

pub const TRADE_EXECUTE: &str = "trade.execute";

pub const METRICS_SYSTEM: &str = "metrics.system";
pub const METRICS_AGENTS: &str = "metrics.agents";

pub const SYSTEM_HEALTH: &str = "system.health";
