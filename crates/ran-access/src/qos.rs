//! Standardized QoS class identifiers (QCI 1–9).
//!
//! Each class fixes a resource type (guaranteed or non-guaranteed bit rate),
//! a scheduling priority (lower is served first), and a packet delay budget.

/// Quality-of-service class of a data bearer.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum QosClass {
    /// QCI 1: guaranteed bit rate.
    ConversationalVoice,
    /// QCI 2: guaranteed bit rate, live streaming.
    ConversationalVideo,
    /// QCI 3: guaranteed bit rate.
    RealTimeGaming,
    /// QCI 4: guaranteed bit rate, buffered streaming.
    BufferedVideo,
    /// QCI 5.
    ImsSignalling,
    /// QCI 6: buffered video and TCP applications, operator-prioritized.
    OperatorVideo,
    /// QCI 7: interactive voice, video, and gaming.
    InteractiveMedia,
    /// QCI 8.
    PremiumVideo,
    /// QCI 9: the default bearer class.
    #[default]
    BestEffort,
}

impl QosClass {
    pub const ALL: [QosClass; 9] = [
        QosClass::ConversationalVoice,
        QosClass::ConversationalVideo,
        QosClass::RealTimeGaming,
        QosClass::BufferedVideo,
        QosClass::ImsSignalling,
        QosClass::OperatorVideo,
        QosClass::InteractiveMedia,
        QosClass::PremiumVideo,
        QosClass::BestEffort,
    ];

    /// Numeric QoS class identifier (1–9).
    pub fn qci(self) -> u8 {
        match self {
            QosClass::ConversationalVoice => 1,
            QosClass::ConversationalVideo => 2,
            QosClass::RealTimeGaming      => 3,
            QosClass::BufferedVideo       => 4,
            QosClass::ImsSignalling       => 5,
            QosClass::OperatorVideo       => 6,
            QosClass::InteractiveMedia    => 7,
            QosClass::PremiumVideo        => 8,
            QosClass::BestEffort          => 9,
        }
    }

    /// Inverse of [`qci`][Self::qci].
    pub fn from_qci(qci: u8) -> Option<QosClass> {
        QosClass::ALL.into_iter().find(|c| c.qci() == qci)
    }

    /// `true` for guaranteed-bit-rate classes (QCI 1–4).
    pub fn is_gbr(self) -> bool {
        self.qci() <= 4
    }

    /// Scheduling priority; 1 is served first.
    pub fn priority(self) -> u8 {
        match self {
            QosClass::ConversationalVoice => 2,
            QosClass::ConversationalVideo => 4,
            QosClass::RealTimeGaming      => 3,
            QosClass::BufferedVideo       => 5,
            QosClass::ImsSignalling       => 1,
            QosClass::OperatorVideo       => 6,
            QosClass::InteractiveMedia    => 7,
            QosClass::PremiumVideo        => 8,
            QosClass::BestEffort          => 9,
        }
    }

    /// Packet delay budget in milliseconds.
    pub fn delay_budget_ms(self) -> u16 {
        match self {
            QosClass::RealTimeGaming => 50,
            QosClass::ConversationalVoice
            | QosClass::ImsSignalling
            | QosClass::InteractiveMedia => 100,
            QosClass::ConversationalVideo => 150,
            QosClass::BufferedVideo
            | QosClass::OperatorVideo
            | QosClass::PremiumVideo
            | QosClass::BestEffort => 300,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QosClass::ConversationalVoice => "conversational-voice",
            QosClass::ConversationalVideo => "conversational-video",
            QosClass::RealTimeGaming      => "real-time-gaming",
            QosClass::BufferedVideo       => "buffered-video",
            QosClass::ImsSignalling       => "ims-signalling",
            QosClass::OperatorVideo       => "operator-video",
            QosClass::InteractiveMedia    => "interactive-media",
            QosClass::PremiumVideo        => "premium-video",
            QosClass::BestEffort          => "best-effort",
        }
    }
}

impl std::fmt::Display for QosClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (QCI {})", self.as_str(), self.qci())
    }
}
