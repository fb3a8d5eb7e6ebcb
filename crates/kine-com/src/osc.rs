use crate::ComError;
use kine_base::Vec2;
use kine_pose::PoseEstimate;
use rosc::{encoder, OscMessage, OscPacket, OscType};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use tokio::net::UdpSocket;

/// Where poses go unless configured otherwise (SuperCollider's default port).
pub const DEFAULT_TARGET: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 57120));

/// Sent once before the first pose: capture width and height as ints.
pub const START_ADDR: &str = "/start";

/// One per captured frame: `x0, y0, ..., x16, y16` as floats, `-1` for
/// undetected points, no arguments when nobody is in view.
pub const POSES_ADDR: &str = "/poses";

/// Settings of a [`PoseSender`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoseSenderConfig {
    target: SocketAddr,
    bind: SocketAddr,
}

impl Default for PoseSenderConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
            bind: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)),
        }
    }
}

impl PoseSenderConfig {
    pub fn with_target(mut self, target: SocketAddr) -> Self {
        self.target = target;
        self
    }

    /// Local address of the sending socket; port 0 picks a free one.
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn bind(&self) -> SocketAddr {
        self.bind
    }
}

pub fn start_message(frame_size: Vec2<usize>) -> OscMessage {
    let dim = |v: usize| OscType::Int(i32::try_from(v).unwrap_or(i32::MAX));
    OscMessage {
        addr: START_ADDR.to_string(),
        args: vec![dim(frame_size.x), dim(frame_size.y)],
    }
}

pub fn pose_message(pose: &PoseEstimate) -> OscMessage {
    OscMessage {
        addr: POSES_ADDR.to_string(),
        args: pose.flatten().into_iter().map(OscType::Float).collect(),
    }
}

pub fn encode_message(msg: &OscMessage) -> Result<Vec<u8>, ComError> {
    let packet = OscPacket::Message(msg.clone());
    Ok(encoder::encode(&packet)?)
}

/// Fire-and-forget OSC client for pose results.
pub struct PoseSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl PoseSender {
    pub async fn bind(config: PoseSenderConfig) -> Result<Self, ComError> {
        let socket = UdpSocket::bind(config.bind).await?;
        log::info!(
            "sending poses from {} to {}",
            socket.local_addr()?,
            config.target
        );
        Ok(Self {
            socket,
            target: config.target,
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ComError> {
        Ok(self.socket.local_addr()?)
    }

    pub async fn send(&self, msg: &OscMessage) -> Result<(), ComError> {
        let data = encode_message(msg)?;
        self.socket.send_to(&data, self.target).await?;
        Ok(())
    }

    pub async fn send_start(&self, frame_size: Vec2<usize>) -> Result<(), ComError> {
        self.send(&start_message(frame_size)).await
    }

    pub async fn send_pose(&self, pose: &PoseEstimate) -> Result<(), ComError> {
        self.send(&pose_message(pose)).await
    }
}
