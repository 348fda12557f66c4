use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	pub x: f64,
	pub y: f64,
}

impl Vec2 {
	pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y).sqrt()
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

impl Add for Vec2 {
	type Output = Self;

	fn add(self, rhs: Self) -> Self {
		Self::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Vec2 {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self {
		Self::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Vec2 {
	type Output = Self;

	fn mul(self, k: f64) -> Self {
		Self::new(self.x * k, self.y * k)
	}
}

impl AddAssign for Vec2 {
	fn add_assign(&mut self, rhs: Self) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl SubAssign for Vec2 {
	fn sub_assign(&mut self, rhs: Self) {
		self.x -= rhs.x;
		self.y -= rhs.y;
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Person,
	Ip,
	Domain,
	Wallet,
	Unknown,
}

impl NodeKind {
	pub const ALL: [NodeKind; 5] = [
		NodeKind::Person,
		NodeKind::Ip,
		NodeKind::Domain,
		NodeKind::Wallet,
		NodeKind::Unknown,
	];

	pub fn color(self) -> &'static str {
		match self {
			NodeKind::Person => "#f59e0b",
			NodeKind::Ip => "#3b82f6",
			NodeKind::Domain => "#10b981",
			NodeKind::Wallet => "#8b5cf6",
			NodeKind::Unknown => "#ef4444",
		}
	}

	/// Name shown in the legend.
	pub fn legend(self) -> &'static str {
		match self {
			NodeKind::Person => "Person",
			NodeKind::Ip => "IP Address",
			NodeKind::Domain => "Domain",
			NodeKind::Wallet => "Wallet",
			NodeKind::Unknown => "Unknown",
		}
	}
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			NodeKind::Person => "person",
			NodeKind::Ip => "ip",
			NodeKind::Domain => "domain",
			NodeKind::Wallet => "wallet",
			NodeKind::Unknown => "unknown",
		})
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
	Owns,
	Hosts,
	Transacted,
	Connected,
	Originates,
}

impl fmt::Display for LinkKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			LinkKind::Owns => "owns",
			LinkKind::Hosts => "hosts",
			LinkKind::Transacted => "transacted",
			LinkKind::Connected => "connected",
			LinkKind::Originates => "originates",
		})
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskLevel {
	Low,
	Elevated,
	High,
}

impl RiskLevel {
	pub fn from_score(risk: u8) -> Self {
		match risk {
			71.. => RiskLevel::High,
			41..=70 => RiskLevel::Elevated,
			_ => RiskLevel::Low,
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			RiskLevel::High => "#ef4444",
			RiskLevel::Elevated => "#eab308",
			RiskLevel::Low => "#22c55e",
		}
	}
}

pub const MAX_RISK: u8 = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	pub kind: NodeKind,
	pub position: Vec2,
	pub velocity: Vec2,
	pub risk: u8,
	pub details: String,
}

impl GraphNode {
	/// A node at rest at `position`. Risk is clamped to `0..=100`.
	pub fn new(
		id: impl Into<String>,
		label: impl Into<String>,
		kind: NodeKind,
		position: Vec2,
		risk: u8,
		details: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			kind,
			position,
			velocity: Vec2::ZERO,
			risk: risk.min(MAX_RISK),
			details: details.into(),
		}
	}

	pub fn risk_level(&self) -> RiskLevel {
		RiskLevel::from_score(self.risk)
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	pub kind: LinkKind,
}

impl GraphLink {
	pub fn new(source: impl Into<String>, target: impl Into<String>, kind: LinkKind) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			kind,
		}
	}

	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn risk_bands_match_panel_thresholds() {
		assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
		assert_eq!(RiskLevel::from_score(40), RiskLevel::Low);
		assert_eq!(RiskLevel::from_score(41), RiskLevel::Elevated);
		assert_eq!(RiskLevel::from_score(70), RiskLevel::Elevated);
		assert_eq!(RiskLevel::from_score(71), RiskLevel::High);
		assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
	}

	#[test]
	fn node_risk_is_clamped() {
		let node = GraphNode::new("a", "A", NodeKind::Ip, Vec2::ZERO, 250, "");
		assert_eq!(node.risk, MAX_RISK);
		assert_eq!(node.velocity, Vec2::ZERO);
	}

	#[test]
	fn link_touches_either_endpoint() {
		let link = GraphLink::new("a", "b", LinkKind::Owns);
		assert!(link.touches("a"));
		assert!(link.touches("b"));
		assert!(!link.touches("c"));
	}
}
