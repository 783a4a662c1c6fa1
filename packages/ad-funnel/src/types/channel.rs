//! Channels, funnel stages and the per-channel schema table.
//!
//! [`ChannelSchema`] is the single place that knows, for each channel, which
//! fields a record carries, which root key the response list lives under, how
//! many items one request yields and how placeholders are shaped. The
//! dispatcher and the workbook writer read it instead of matching on channels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// Record field names.
pub mod fields {
    pub const AD_NAME: &str = "Ad Name";
    pub const FUNNEL_STAGE: &str = "Funnel Stage";
    pub const HEADLINE: &str = "Headline";
    pub const SUBJECT_LINE: &str = "Subject Line";
    pub const BODY: &str = "Body";
    pub const CTA: &str = "CTA";
    pub const INTRODUCTORY_TEXT: &str = "Introductory Text";
    pub const PRIMARY_TEXT: &str = "Primary Text";
    pub const IMAGE_COPY: &str = "Image Copy";
    pub const LINK_DESCRIPTION: &str = "Link Description";
    pub const DESTINATION: &str = "Destination";
    pub const CTA_BUTTON: &str = "CTA Button";
    pub const DESCRIPTION: &str = "Description";
}

use fields::*;

/// A target ad platform or format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    Email,
    LinkedIn,
    Facebook,
    GoogleSearch,
    GoogleDisplay,
}

impl Channel {
    /// All channels in generation and export order.
    pub const ALL: [Channel; 5] = [
        Channel::Email,
        Channel::LinkedIn,
        Channel::Facebook,
        Channel::GoogleSearch,
        Channel::GoogleDisplay,
    ];

    /// Display label, also used as the workbook sheet name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::LinkedIn => "LinkedIn",
            Self::Facebook => "Facebook",
            Self::GoogleSearch => "Google Search",
            Self::GoogleDisplay => "Google Display",
        }
    }

    /// Label without spaces, for ad names.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::LinkedIn => "LinkedIn",
            Self::Facebook => "Facebook",
            Self::GoogleSearch => "GoogleSearch",
            Self::GoogleDisplay => "GoogleDisplay",
        }
    }

    /// Funnel stages this channel generates one request for.
    ///
    /// Empty for the Google channels, which produce a flat list.
    pub fn stages(&self) -> &'static [FunnelStage] {
        match self {
            Self::Email => &[FunnelStage::DemandCapture],
            Self::LinkedIn | Self::Facebook => &FunnelStage::ALL,
            Self::GoogleSearch | Self::GoogleDisplay => &[],
        }
    }

    /// Number of requests issued for this channel.
    pub fn request_count(&self) -> usize {
        self.stages().len().max(1)
    }

    /// Schema table entry for this channel.
    pub fn schema(&self) -> &'static ChannelSchema {
        match self {
            Self::Email => &EMAIL_SCHEMA,
            Self::LinkedIn => &LINKEDIN_SCHEMA,
            Self::Facebook => &FACEBOOK_SCHEMA,
            Self::GoogleSearch => &GOOGLE_SEARCH_SCHEMA,
            Self::GoogleDisplay => &GOOGLE_DISPLAY_SCHEMA,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A marketing lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunnelStage {
    BrandAwareness,
    DemandGen,
    DemandCapture,
}

impl FunnelStage {
    /// Stages in funnel order.
    pub const ALL: [FunnelStage; 3] = [
        FunnelStage::BrandAwareness,
        FunnelStage::DemandGen,
        FunnelStage::DemandCapture,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::BrandAwareness => "Brand Awareness",
            Self::DemandGen => "Demand Gen",
            Self::DemandCapture => "Demand Capture",
        }
    }

    /// Label without spaces, for ad names.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::BrandAwareness => "BrandAwareness",
            Self::DemandGen => "DemandGen",
            Self::DemandCapture => "DemandCapture",
        }
    }
}

impl fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the Demand Capture stage asks the lead to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FunnelObjective {
    #[default]
    DemoBooking,
    SalesMeeting,
}

impl FunnelObjective {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DemoBooking => "Demo Booking",
            Self::SalesMeeting => "Sales Meeting",
        }
    }
}

impl fmt::Display for FunnelObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FunnelObjective {
    type Err = InputError;

    /// Accepts the display label or a kebab/snake-case form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "demobooking" | "demo" => Ok(Self::DemoBooking),
            "salesmeeting" | "sales" => Ok(Self::SalesMeeting),
            _ => Err(InputError::UnknownObjective(s.to_string())),
        }
    }
}

/// How many items a single request for a channel yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSizing {
    /// One item per requested variation
    ContentCount,
    /// Fixed by the ad format
    Fixed(usize),
}

/// Shape of the sentinel records that replace failed generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderTemplate {
    /// Field receiving the failure tag
    pub tag_field: &'static str,
    /// Field receiving the human-readable failure message
    pub message_field: &'static str,
    /// Tag is a full ad name (`JSONError_Email_Call_1`) rather than a bare tag
    pub named: bool,
}

/// One row of the channel table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSchema {
    pub channel: Channel,
    /// Record fields, in column order
    pub fields: &'static [&'static str],
    /// Key holding the list of ads in the response object
    pub root_key: &'static str,
    pub sizing: BatchSizing,
    pub placeholder: PlaceholderTemplate,
    /// Index from which descriptions must be empty (Google Search only)
    pub blank_description_from: Option<usize>,
}

impl ChannelSchema {
    /// Items expected from one request.
    pub fn batch_size(&self, content_count: usize) -> usize {
        match self.sizing {
            BatchSizing::ContentCount => content_count,
            BatchSizing::Fixed(n) => n,
        }
    }

    /// Records expected in the whole channel result.
    pub fn expected_len(&self, content_count: usize) -> usize {
        self.batch_size(content_count) * self.channel.request_count()
    }

    /// Whether the field set includes `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }
}

/// Google Search always asks for 15 headlines.
pub const GOOGLE_SEARCH_ITEMS: usize = 15;

/// Only the first four Google Search items carry a description.
pub const GOOGLE_SEARCH_DESCRIPTIONS: usize = 4;

/// Google Display always asks for 5 headline/description pairs.
pub const GOOGLE_DISPLAY_ITEMS: usize = 5;

static EMAIL_SCHEMA: ChannelSchema = ChannelSchema {
    channel: Channel::Email,
    fields: &[AD_NAME, FUNNEL_STAGE, HEADLINE, SUBJECT_LINE, BODY, CTA],
    root_key: "email_ads",
    sizing: BatchSizing::ContentCount,
    placeholder: PlaceholderTemplate {
        tag_field: AD_NAME,
        message_field: HEADLINE,
        named: true,
    },
    blank_description_from: None,
};

static LINKEDIN_SCHEMA: ChannelSchema = ChannelSchema {
    channel: Channel::LinkedIn,
    fields: &[
        AD_NAME,
        FUNNEL_STAGE,
        INTRODUCTORY_TEXT,
        IMAGE_COPY,
        HEADLINE,
        DESTINATION,
        CTA_BUTTON,
    ],
    root_key: "ads",
    sizing: BatchSizing::ContentCount,
    placeholder: PlaceholderTemplate {
        tag_field: AD_NAME,
        message_field: INTRODUCTORY_TEXT,
        named: true,
    },
    blank_description_from: None,
};

static FACEBOOK_SCHEMA: ChannelSchema = ChannelSchema {
    channel: Channel::Facebook,
    fields: &[
        AD_NAME,
        FUNNEL_STAGE,
        PRIMARY_TEXT,
        IMAGE_COPY,
        HEADLINE,
        LINK_DESCRIPTION,
        DESTINATION,
        CTA_BUTTON,
    ],
    root_key: "facebook_ads",
    sizing: BatchSizing::ContentCount,
    placeholder: PlaceholderTemplate {
        tag_field: AD_NAME,
        message_field: PRIMARY_TEXT,
        named: true,
    },
    blank_description_from: None,
};

static GOOGLE_SEARCH_SCHEMA: ChannelSchema = ChannelSchema {
    channel: Channel::GoogleSearch,
    fields: &[HEADLINE, DESCRIPTION],
    root_key: "ads",
    sizing: BatchSizing::Fixed(GOOGLE_SEARCH_ITEMS),
    placeholder: PlaceholderTemplate {
        tag_field: HEADLINE,
        message_field: DESCRIPTION,
        named: false,
    },
    blank_description_from: Some(GOOGLE_SEARCH_DESCRIPTIONS),
};

static GOOGLE_DISPLAY_SCHEMA: ChannelSchema = ChannelSchema {
    channel: Channel::GoogleDisplay,
    fields: &[HEADLINE, DESCRIPTION],
    root_key: "ads",
    sizing: BatchSizing::Fixed(GOOGLE_DISPLAY_ITEMS),
    placeholder: PlaceholderTemplate {
        tag_field: HEADLINE,
        message_field: DESCRIPTION,
        named: false,
    },
    blank_description_from: None,
};
