//! Fixed-timestep force-directed layout.
//!
//! One [`step`] combines pairwise repulsion, center gravity and Hooke springs
//! along links, then integrates with unit mass and velocity damping. Forces
//! are accumulated from start-of-tick positions before any node moves.
//!
//! Links whose source or target id is absent from the node slice contribute
//! nothing. This is part of the contract, not an error: the kernel never
//! fails on malformed graphs.

use std::collections::HashMap;

use thiserror::Error;

use super::types::{GraphLink, GraphNode, Vec2};

/// Distances below this are treated as this value.
pub const MIN_DISTANCE: f64 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParameters {
	pub center: Vec2,
	pub repulsion: f64,
	pub rest_length: f64,
	pub spring_strength: f64,
	pub gravity: f64,
	pub damping: f64,
	pub ticks_per_second: u32,
}

impl Default for SimulationParameters {
	fn default() -> Self {
		Self {
			center: Vec2::new(400.0, 300.0),
			repulsion: 1000.0,
			rest_length: 100.0,
			spring_strength: 0.05,
			gravity: 0.005,
			damping: 0.9,
			ticks_per_second: 60,
		}
	}
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
	#[error("{name} must be finite, got {value}")]
	NotFinite { name: &'static str, value: f64 },
	#[error("{name} must not be negative, got {value}")]
	Negative { name: &'static str, value: f64 },
	#[error("rest length must be positive, got {0}")]
	RestLength(f64),
	#[error("damping must lie strictly between 0 and 1, got {0}")]
	Damping(f64),
	#[error("tick rate must be at least one tick per second")]
	TickRate,
}

impl SimulationParameters {
	pub fn validate(self) -> Result<Self, ConfigError> {
		let scalars = [
			("center.x", self.center.x),
			("center.y", self.center.y),
			("repulsion", self.repulsion),
			("rest_length", self.rest_length),
			("spring_strength", self.spring_strength),
			("gravity", self.gravity),
			("damping", self.damping),
		];
		if let Some(&(name, value)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
			return Err(ConfigError::NotFinite { name, value });
		}
		for (name, value) in [
			("repulsion", self.repulsion),
			("spring_strength", self.spring_strength),
			("gravity", self.gravity),
		] {
			if value < 0.0 {
				return Err(ConfigError::Negative { name, value });
			}
		}
		if self.rest_length <= 0.0 {
			return Err(ConfigError::RestLength(self.rest_length));
		}
		if !(self.damping > 0.0 && self.damping < 1.0) {
			return Err(ConfigError::Damping(self.damping));
		}
		if self.ticks_per_second == 0 {
			return Err(ConfigError::TickRate);
		}
		Ok(self)
	}

	/// Milliseconds between two ticks.
	pub fn tick_interval_ms(&self) -> f64 {
		1000.0 / f64::from(self.ticks_per_second.max(1))
	}
}

fn guarded(delta: Vec2) -> f64 {
	delta.length().max(MIN_DISTANCE)
}

/// Coulomb-style push on `a` away from `b`.
pub(crate) fn repulsion_force(a: Vec2, b: Vec2, params: &SimulationParameters) -> Vec2 {
	let delta = a - b;
	let dist = guarded(delta);
	delta * (params.repulsion / (dist * dist) / dist)
}

pub(crate) fn gravity_force(p: Vec2, params: &SimulationParameters) -> Vec2 {
	(params.center - p) * params.gravity
}

/// Hooke force on `source`; `target` receives the negation.
pub(crate) fn spring_force(source: Vec2, target: Vec2, params: &SimulationParameters) -> Vec2 {
	let delta = target - source;
	let dist = guarded(delta);
	delta * (params.spring_strength * (dist - params.rest_length) / dist)
}

/// Advance every node by one tick.
pub fn step(nodes: &mut [GraphNode], links: &[GraphLink], params: &SimulationParameters) {
	if nodes.is_empty() {
		return;
	}

	let positions: Vec<Vec2> = nodes.iter().map(|n| n.position).collect();
	let mut forces = vec![Vec2::ZERO; positions.len()];

	for i in 0..positions.len() {
		for j in (i + 1)..positions.len() {
			let f = repulsion_force(positions[i], positions[j], params);
			forces[i] += f;
			forces[j] -= f;
		}
		forces[i] += gravity_force(positions[i], params);
	}

	let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
	for (i, node) in nodes.iter().enumerate() {
		index.entry(node.id.as_str()).or_insert(i);
	}
	for link in links {
		let (Some(&s), Some(&t)) = (
			index.get(link.source.as_str()),
			index.get(link.target.as_str()),
		) else {
			continue;
		};
		let f = spring_force(positions[s], positions[t], params);
		forces[s] += f;
		forces[t] -= f;
	}

	for (node, force) in nodes.iter_mut().zip(forces) {
		node.velocity = (node.velocity + force) * params.damping;
		node.position += node.velocity;
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::entity_graph::types::{LinkKind, NodeKind};

	const EPSILON: f64 = 1e-9;

	fn node(id: &str, x: f64, y: f64) -> GraphNode {
		GraphNode::new(id, id, NodeKind::Unknown, Vec2::new(x, y), 0, "")
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < EPSILON
	}

	#[test]
	fn defaults_are_valid() {
		assert!(SimulationParameters::default().validate().is_ok());
		assert!(close(SimulationParameters::default().tick_interval_ms(), 1000.0 / 60.0));
	}

	#[test]
	fn validate_rejects_bad_parameters() {
		let base = SimulationParameters::default();
		assert_eq!(
			SimulationParameters { damping: 1.0, ..base.clone() }.validate(),
			Err(ConfigError::Damping(1.0))
		);
		assert_eq!(
			SimulationParameters { rest_length: 0.0, ..base.clone() }.validate(),
			Err(ConfigError::RestLength(0.0))
		);
		assert_eq!(
			SimulationParameters { gravity: -0.1, ..base.clone() }.validate(),
			Err(ConfigError::Negative { name: "gravity", value: -0.1 })
		);
		assert_eq!(
			SimulationParameters { ticks_per_second: 0, ..base.clone() }.validate(),
			Err(ConfigError::TickRate)
		);
		assert!(matches!(
			SimulationParameters { repulsion: f64::NAN, ..base }.validate(),
			Err(ConfigError::NotFinite { name: "repulsion", .. })
		));
	}

	#[test]
	fn empty_graph_is_a_no_op() {
		let mut nodes: Vec<GraphNode> = Vec::new();
		step(&mut nodes, &[GraphLink::new("a", "b", LinkKind::Owns)], &SimulationParameters::default());
		assert!(nodes.is_empty());
	}

	#[test]
	fn two_node_golden_tick() {
		let mut nodes = vec![node("a", 0.0, 0.0), node("b", 200.0, 0.0)];
		let links = [GraphLink::new("a", "b", LinkKind::Connected)];
		step(&mut nodes, &links, &SimulationParameters::default());

		// a: repulsion -0.025, gravity +2.0, spring +5.0; vy from gravity 1.5; damped by 0.9
		let (a, b) = (&nodes[0], &nodes[1]);
		assert!(close(a.velocity.x, 6.975 * 0.9), "{:?}", a.velocity);
		assert!(close(a.velocity.y, 1.35));
		assert!(close(a.position.x, 6.2775));
		assert!(close(a.position.y, 1.35));

		// b: repulsion +0.025, gravity +1.0, spring -5.0
		assert!(close(b.velocity.x, -3.975 * 0.9), "{:?}", b.velocity);
		assert!(close(b.position.x, 200.0 - 3.5775));
		assert!(close(b.position.y, 1.35));
		assert!(a.velocity.x > 0.0 && b.velocity.x < 0.0);
	}

	#[test]
	fn spring_is_slack_at_rest_length() {
		let params = SimulationParameters::default();
		let f = spring_force(Vec2::new(10.0, 10.0), Vec2::new(70.0, 90.0), &params);
		assert!(f.length() < EPSILON, "{f:?}");

		let linked = {
			let mut nodes = vec![node("a", 10.0, 10.0), node("b", 70.0, 90.0)];
			step(&mut nodes, &[GraphLink::new("a", "b", LinkKind::Owns)], &params);
			nodes
		};
		let unlinked = {
			let mut nodes = vec![node("a", 10.0, 10.0), node("b", 70.0, 90.0)];
			step(&mut nodes, &[], &params);
			nodes
		};
		for (l, u) in linked.iter().zip(&unlinked) {
			assert!((l.position - u.position).length() < EPSILON);
		}
	}

	#[test]
	fn spring_pulls_stretched_and_pushes_compressed() {
		let params = SimulationParameters::default();
		assert!(spring_force(Vec2::ZERO, Vec2::new(200.0, 0.0), &params).x > 0.0);
		assert!(spring_force(Vec2::ZERO, Vec2::new(50.0, 0.0), &params).x < 0.0);
	}

	#[test]
	fn dangling_link_is_ignored() {
		let params = SimulationParameters::default();
		let mut with_dangling = vec![node("a", 120.0, 80.0), node("b", 500.0, 420.0)];
		let mut without = with_dangling.clone();
		step(
			&mut with_dangling,
			&[GraphLink::new("a", "ghost", LinkKind::Connected), GraphLink::new("ghost", "b", LinkKind::Hosts)],
			&params,
		);
		step(&mut without, &[], &params);
		assert_eq!(with_dangling, without);
	}

	#[test]
	fn coincident_nodes_stay_finite() {
		let params = SimulationParameters::default();
		let mut nodes = vec![node("a", 50.0, 50.0), node("b", 50.0, 50.0), node("c", 50.0, 50.0)];
		let links = [GraphLink::new("a", "b", LinkKind::Owns)];
		for _ in 0..100 {
			step(&mut nodes, &links, &params);
		}
		assert!(nodes.iter().all(|n| n.position.is_finite() && n.velocity.is_finite()));
	}

	#[test]
	fn forces_use_start_of_tick_positions() {
		let params = SimulationParameters::default();
		let make = || vec![node("a", 380.0, 300.0), node("b", 420.0, 300.0), node("c", 400.0, 330.0)];
		let mut forward = make();
		let mut reversed: Vec<GraphNode> = make().into_iter().rev().collect();
		step(&mut forward, &[], &params);
		step(&mut reversed, &[], &params);
		reversed.reverse();
		for (f, r) in forward.iter().zip(&reversed) {
			assert!((f.position - r.position).length() < EPSILON);
		}
	}

	#[test]
	fn lone_node_settles_on_center() {
		let params = SimulationParameters::default();
		let mut nodes = vec![node("a", 100.0, 500.0)];
		let mut speeds = Vec::new();
		for _ in 0..600 {
			step(&mut nodes, &[], &params);
			speeds.push(nodes[0].velocity.length());
		}
		let peak = |range: std::ops::Range<usize>| speeds[range].iter().copied().fold(0.0, f64::max);
		assert!(peak(300..400) < peak(100..200));
		assert!(peak(500..600) < peak(300..400));
		assert!((nodes[0].position - params.center).length() < 1e-6);
	}

	proptest! {
		#[test]
		fn prop_unlinked_layout_stays_finite(
			coords in prop::collection::vec((-1000.0..1000.0f64, -1000.0..1000.0f64), 1..12),
			ticks in 1..200usize,
		) {
			let params = SimulationParameters::default();
			let mut nodes: Vec<GraphNode> = coords
				.iter()
				.enumerate()
				.map(|(i, &(x, y))| node(&i.to_string(), x, y))
				.collect();
			for _ in 0..ticks {
				step(&mut nodes, &[], &params);
			}
			prop_assert!(nodes.iter().all(|n| n.position.is_finite() && n.velocity.is_finite()));
		}
	}
}
