use log::{debug, warn};
use rand::Rng;

use super::physics::{self, SimulationParameters};
use super::seed;
use super::types::{GraphData, GraphLink, GraphNode, LinkKind, NodeKind, Vec2};

const EXPAND_KINDS: [NodeKind; 4] = [NodeKind::Ip, NodeKind::Domain, NodeKind::Wallet, NodeKind::Unknown];
const EXPAND_SPREAD: f64 = 50.0;
const EXPAND_DETAILS: &str = "Newly discovered node via expansion.";
const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
	#[default]
	Running,
	Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	Outgoing,
	Incoming,
}

impl Direction {
	pub fn arrow(self) -> &'static str {
		match self {
			Direction::Outgoing => "→",
			Direction::Incoming => "←",
		}
	}
}

/// One row of a node's connection list.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	pub direction: Direction,
	pub kind: LinkKind,
	pub other_id: String,
	/// `None` when the other endpoint does not resolve.
	pub other_label: Option<String>,
}

/// Post-tick view handed to observers.
pub struct Snapshot<'a> {
	pub tick: u64,
	pub nodes: &'a [GraphNode],
	pub links: &'a [GraphLink],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&Snapshot<'_>)>;

/// Owns the graph of one visualization session and advances it tick by tick.
pub struct Simulation {
	nodes: Vec<GraphNode>,
	links: Vec<GraphLink>,
	params: SimulationParameters,
	state: RunState,
	tick: u64,
	observers: Vec<(SubscriptionId, Observer)>,
	next_subscription: u64,
}

impl Simulation {
	pub fn new(data: GraphData, params: SimulationParameters) -> Self {
		Self {
			nodes: data.nodes,
			links: data.links,
			params,
			state: RunState::Running,
			tick: 0,
			observers: Vec::new(),
			next_subscription: 0,
		}
	}

	/// A session over the seed graph.
	pub fn seeded(params: SimulationParameters) -> Self {
		Self::new(seed::graph(), params)
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[GraphLink] {
		&self.links
	}

	pub fn params(&self) -> &SimulationParameters {
		&self.params
	}

	pub fn state(&self) -> RunState {
		self.state
	}

	pub fn is_running(&self) -> bool {
		self.state == RunState::Running
	}

	pub fn tick_count(&self) -> u64 {
		self.tick
	}

	pub fn pause(&mut self) {
		if self.state != RunState::Paused {
			debug!("simulation paused at tick {}", self.tick);
			self.state = RunState::Paused;
		}
	}

	pub fn resume(&mut self) {
		if self.state != RunState::Running {
			debug!("simulation resumed at tick {}", self.tick);
			self.state = RunState::Running;
		}
	}

	pub fn toggle(&mut self) -> RunState {
		match self.state {
			RunState::Running => self.pause(),
			RunState::Paused => self.resume(),
		}
		self.state
	}

	/// Runs one step if running. Returns whether a step happened.
	///
	/// Each call is at most one step; time spent paused is never made up.
	pub fn tick(&mut self) -> bool {
		if self.state == RunState::Paused {
			return false;
		}
		physics::step(&mut self.nodes, &self.links, &self.params);
		self.tick += 1;

		let snapshot = Snapshot {
			tick: self.tick,
			nodes: &self.nodes,
			links: &self.links,
		};
		for (_, observer) in &mut self.observers {
			observer(&snapshot);
		}
		true
	}

	pub fn subscribe(&mut self, observer: impl FnMut(&Snapshot<'_>) + 'static) -> SubscriptionId {
		let id = SubscriptionId(self.next_subscription);
		self.next_subscription += 1;
		self.observers.push((id, Box::new(observer)));
		id
	}

	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		let before = self.observers.len();
		self.observers.retain(|(sid, _)| *sid != id);
		self.observers.len() != before
	}

	/// Back to the seed graph, running, tick zero. Observers stay subscribed.
	pub fn reset(&mut self) {
		let data = seed::graph();
		self.nodes = data.nodes;
		self.links = data.links;
		self.state = RunState::Running;
		self.tick = 0;
		debug!("simulation reset to {} seed nodes", self.nodes.len());
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn links_touching<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphLink> + 'a {
		self.links.iter().filter(move |l| l.touches(id))
	}

	pub fn connections(&self, id: &str) -> Vec<Connection> {
		self.links_touching(id)
			.map(|link| {
				let (direction, other) = if link.source == id {
					(Direction::Outgoing, &link.target)
				} else {
					(Direction::Incoming, &link.source)
				};
				Connection {
					direction,
					kind: link.kind,
					other_id: other.clone(),
					other_label: self.node(other).map(|n| n.label.clone()),
				}
			})
			.collect()
	}

	/// Topmost node within `radius` of `point`. Later nodes draw over earlier ones.
	pub fn node_at(&self, point: Vec2, radius: f64) -> Option<&GraphNode> {
		self.nodes
			.iter()
			.rev()
			.find(|n| (n.position - point).length() < radius)
	}

	/// Inserts `node` and a link `link_to -> node`. The link is kept even when
	/// `link_to` does not name a node.
	pub fn add_node(&mut self, node: GraphNode, link_to: &str, kind: LinkKind) {
		if self.node(link_to).is_none() {
			warn!("linking new node {} to unknown node {link_to}", node.id);
		}
		debug!("adding node {} ({}) linked from {link_to}", node.id, node.kind);
		self.links.push(GraphLink::new(link_to, node.id.clone(), kind));
		self.nodes.push(node);
	}

	/// Adds one synthesized node linked from a random existing node. On an
	/// empty graph the node is added alone.
	pub fn expand<R: Rng>(&mut self, rng: &mut R) -> &GraphNode {
		let node = self.synthesize(rng);
		if self.nodes.is_empty() {
			debug!("expanding empty graph with unlinked node {}", node.id);
			self.nodes.push(node);
		} else {
			let anchor = self.nodes[rng.random_range(0..self.nodes.len())].id.clone();
			self.add_node(node, &anchor, LinkKind::Connected);
		}
		&self.nodes[self.nodes.len() - 1]
	}

	fn synthesize<R: Rng>(&self, rng: &mut R) -> GraphNode {
		let kind = EXPAND_KINDS[rng.random_range(0..EXPAND_KINDS.len())];
		let prefix = match kind {
			NodeKind::Ip => "10.0.0.",
			NodeKind::Wallet => "0x",
			NodeKind::Unknown => "Unknown",
			_ => "node-",
		};
		let label = format!("{prefix}{}", rng.random_range(0..999));
		let jitter = Vec2::new(rng.random::<f64>() - 0.5, rng.random::<f64>() - 0.5) * EXPAND_SPREAD;
		let risk = rng.random_range(0..100u8);

		let mut id = random_id(rng);
		while self.node(&id).is_some() {
			id = random_id(rng);
		}

		GraphNode::new(id, label, kind, self.params.center + jitter, risk, EXPAND_DETAILS)
	}
}

fn random_id<R: Rng>(rng: &mut R) -> String {
	(0..ID_LEN)
		.map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
		.collect()
}
