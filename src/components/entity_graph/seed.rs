//! The fixed graph every session starts from.

use super::types::{GraphData, GraphLink, GraphNode, LinkKind, NodeKind, Vec2};

pub fn graph() -> GraphData {
	let node = |id: &str, label: &str, kind, x, y, risk, details: &str| {
		GraphNode::new(id, label, kind, Vec2::new(x, y), risk, details)
	};

	let nodes = vec![
		node("1", "John Doe", NodeKind::Person, 400.0, 300.0, 85, "Suspected operator of botnet C2."),
		node("2", "192.168.44.22", NodeKind::Ip, 300.0, 200.0, 92, "Known command & control server."),
		node("3", "crypto-mix.io", NodeKind::Domain, 500.0, 200.0, 65, "Money laundering frontend."),
		node(
			"4",
			"0x7a...9f22",
			NodeKind::Wallet,
			500.0,
			400.0,
			45,
			"High volume output wallet linked to mixing service.",
		),
		node(
			"5",
			"Jane Smith",
			NodeKind::Person,
			200.0,
			400.0,
			15,
			"Registered owner of domain (possible mule).",
		),
		node("6", "89.12.33.11", NodeKind::Ip, 350.0, 100.0, 70, "Proxy node."),
		node("7", "nexus-labs.net", NodeKind::Domain, 600.0, 300.0, 30, "Associated infrastructure."),
		node(
			"8",
			"Unknown Source",
			NodeKind::Unknown,
			100.0,
			100.0,
			80,
			"Unidentified inbound traffic origin.",
		),
		node("9", "bc1q...x882", NodeKind::Wallet, 600.0, 500.0, 95, "Blacklisted BTC address."),
	];

	let links = [
		("1", "2", LinkKind::Owns),
		("1", "3", LinkKind::Owns),
		("3", "4", LinkKind::Transacted),
		("2", "6", LinkKind::Connected),
		("5", "3", LinkKind::Owns),
		("1", "7", LinkKind::Hosts),
		("8", "2", LinkKind::Originates),
		("1", "9", LinkKind::Owns),
	]
	.into_iter()
	.map(|(source, target, kind)| GraphLink::new(source, target, kind))
	.collect();

	GraphData { nodes, links }
}
