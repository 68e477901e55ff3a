use crate::error::NegotiationError;
use crate::media::{MediaKind, MediaTrack, TrackSource};
use crate::peer::peer_connector::{PeerConnector, PeerHandle};
use crate::peer::peer_event::{PeerEvent, PeerEventSender};
use crate::peer::peer_state::{ConnectionState, SignalingState};
use crate::peer::send_caps::SendCaps;
use anyhow::Context;
use async_trait::async_trait;
use duet_core::{IceCandidate, IceServerConfig, SdpKind, SessionDescription};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::offer_answer_options::RTCOfferOptions;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::policy::bundle_policy::RTCBundlePolicy;
use webrtc::peer_connection::policy::ice_transport_policy::RTCIceTransportPolicy;
use webrtc::peer_connection::policy::rtcp_mux_policy::RTCRtcpMuxPolicy;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

const ICE_CANDIDATE_POOL_SIZE: u8 = 4;

/// Builds webrtc-rs peer connections.
#[derive(Debug, Clone)]
pub struct RtcPeerConnector {
    ice_servers: Vec<IceServerConfig>,
}

impl RtcPeerConnector {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self { ice_servers }
    }

    fn rtc_configuration(&self) -> RTCConfiguration {
        RTCConfiguration {
            ice_servers: self
                .ice_servers
                .iter()
                .map(|s| RTCIceServer {
                    urls: s.urls.clone(),
                    username: s.username.clone().unwrap_or_default(),
                    credential: s.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ice_transport_policy: RTCIceTransportPolicy::All,
            bundle_policy: RTCBundlePolicy::MaxBundle,
            rtcp_mux_policy: RTCRtcpMuxPolicy::Require,
            ice_candidate_pool_size: ICE_CANDIDATE_POOL_SIZE,
            ..Default::default()
        }
    }

    async fn build(&self) -> anyhow::Result<RTCPeerConnection> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()
            .context("Failed to register default codecs")?;
        let registry = register_default_interceptors(Registry::new(), &mut m)
            .context("Failed to register interceptors")?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        api.new_peer_connection(self.rtc_configuration())
            .await
            .context("Failed to create peer connection")
    }
}

#[async_trait]
impl PeerConnector for RtcPeerConnector {
    async fn connect(
        &self,
        generation: u64,
        events: PeerEventSender,
    ) -> Result<Box<dyn PeerHandle>, NegotiationError> {
        let peer_connection = Arc::new(self.build().await.map_err(NegotiationError::Setup)?);
        attach_callbacks(&peer_connection, generation, events);

        info!("Peer connection #{} created", generation);
        Ok(Box::new(RtcPeerHandle {
            generation,
            peer_connection,
            ice_restart: AtomicBool::new(false),
        }))
    }
}

/// Every callback forwards into the engine's event channel, tagged with the
/// generation it was registered for.
fn attach_callbacks(peer_connection: &RTCPeerConnection, generation: u64, events: PeerEventSender) {
    let ice_tx = events.clone();
    peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
        let tx = ice_tx.clone();
        Box::pin(async move {
            let Some(candidate) = c else { return };
            let Ok(init) = candidate.to_json() else {
                return;
            };
            let _ = tx.send((
                generation,
                PeerEvent::PathCandidateFound(IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                    username_fragment: init.username_fragment,
                }),
            ));
        })
    }));

    let track_tx = events.clone();
    peer_connection.on_track(Box::new(
        move |track: Arc<TrackRemote>, _receiver: Arc<RTCRtpReceiver>, _transceiver: Arc<RTCRtpTransceiver>| {
            let tx = track_tx.clone();
            Box::pin(async move {
                let Some(kind) = MediaKind::from_codec_type(track.kind()) else {
                    return;
                };
                debug!("Remote {} track arrived on peer #{}", kind, generation);
                let _ = tx.send((generation, PeerEvent::TrackAdded(MediaTrack::remote(kind, track))));
            })
        },
    ));

    let state_tx = events.clone();
    peer_connection.on_peer_connection_state_change(Box::new(move |s: RTCPeerConnectionState| {
        let tx = state_tx.clone();
        Box::pin(async move {
            info!("Peer connection #{} state changed: {}", generation, s);
            let _ = tx.send((generation, PeerEvent::ConnectionStateChanged(s.into())));
        })
    }));

    let ice_state_tx = events;
    peer_connection.on_ice_connection_state_change(Box::new(move |s: RTCIceConnectionState| {
        let tx = ice_state_tx.clone();
        Box::pin(async move {
            debug!("ICE state of peer #{} changed: {}", generation, s);
            let _ = tx.send((generation, PeerEvent::IceStateChanged(s.into())));
        })
    }));
}

pub struct RtcPeerHandle {
    generation: u64,
    peer_connection: Arc<RTCPeerConnection>,
    ice_restart: AtomicBool,
}

fn to_rtc(desc: SessionDescription) -> Result<RTCSessionDescription, NegotiationError> {
    let rtc = match desc.kind {
        SdpKind::Offer => RTCSessionDescription::offer(desc.sdp)?,
        SdpKind::Answer => RTCSessionDescription::answer(desc.sdp)?,
    };
    Ok(rtc)
}

#[async_trait]
impl PeerHandle for RtcPeerHandle {
    fn generation(&self) -> u64 {
        self.generation
    }

    fn signaling_state(&self) -> SignalingState {
        self.peer_connection.signaling_state().into()
    }

    fn connection_state(&self) -> ConnectionState {
        self.peer_connection.connection_state().into()
    }

    async fn add_track(&self, track: &MediaTrack) -> Result<(), NegotiationError> {
        let TrackSource::Local(local) = track.source() else {
            return Err(NegotiationError::Rejected(format!(
                "track {} is not a local track",
                track.id()
            )));
        };

        let sender = self
            .peer_connection
            .add_track(Arc::clone(local) as Arc<dyn TrackLocal + Send + Sync>)
            .await?;

        // RTCP has to be drained for the interceptors to work.
        tokio::spawn(async move {
            let mut rtcp_buf = vec![0u8; 1500];
            while let Ok((_, _)) = sender.read(&mut rtcp_buf).await {}
        });

        Ok(())
    }

    /// webrtc-rs has no sender parameters, so nothing is enforced here: the
    /// limits are only recorded on the track for the capture pipeline's
    /// encoder to honour.
    async fn apply_send_caps(&self, track: &MediaTrack, caps: SendCaps) -> Result<(), NegotiationError> {
        track.set_send_caps(caps);
        debug!(
            "Send caps for {} track {}: {} bps",
            track.kind(),
            track.id(),
            caps.max_bitrate_bps
        );
        Ok(())
    }

    fn restart_ice(&self) {
        self.ice_restart.store(true, Ordering::SeqCst);
    }

    async fn create_offer(&self, ice_restart: bool) -> Result<SessionDescription, NegotiationError> {
        let ice_restart = self.ice_restart.swap(false, Ordering::SeqCst) || ice_restart;
        let offer = self
            .peer_connection
            .create_offer(Some(RTCOfferOptions {
                ice_restart,
                ..Default::default()
            }))
            .await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, NegotiationError> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), NegotiationError> {
        self.peer_connection
            .set_local_description(to_rtc(desc)?)
            .await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), NegotiationError> {
        self.peer_connection
            .set_remote_description(to_rtc(desc)?)
            .await?;
        Ok(())
    }

    async fn rollback(&self) -> Result<(), NegotiationError> {
        let mut rollback = RTCSessionDescription::default();
        rollback.sdp_type = RTCSdpType::Rollback;
        self.peer_connection.set_local_description(rollback).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), NegotiationError> {
        self.peer_connection
            .add_ice_candidate(RTCIceCandidateInit {
                candidate: candidate.candidate,
                sdp_mid: candidate.sdp_mid,
                sdp_mline_index: candidate.sdp_m_line_index,
                username_fragment: candidate.username_fragment,
            })
            .await?;
        Ok(())
    }

    async fn close(&self) {
        let pc = &self.peer_connection;
        pc.on_ice_candidate(Box::new(|_| Box::pin(async {})));
        pc.on_track(Box::new(|_, _, _| Box::pin(async {})));
        pc.on_peer_connection_state_change(Box::new(|_| Box::pin(async {})));
        pc.on_ice_connection_state_change(Box::new(|_| Box::pin(async {})));

        if let Err(e) = pc.close().await {
            warn!("Failed to close peer connection #{}: {}", self.generation, e);
        } else {
            info!("Peer connection #{} closed", self.generation);
        }
    }
}
