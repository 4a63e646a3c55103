//! The full editable state carried in a share link's query string.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;
use url::form_urlencoded;

use crate::codec::{self, CodecError, DecodePolicy, Decoded, RawParam};
use crate::model::{
    GeometryModel, Member, MemberGroupProps, Node, ParametricParams, TrussCategory, TrussType,
};

pub const CUSTOM_NODES: &str = "cnodes";
pub const CUSTOM_MEMBERS: &str = "cmems";
pub const FORCES: &str = "zforces";
pub const SPAN: &str = "span";
pub const HEIGHT: &str = "height";
pub const DEPTH: &str = "depth";
pub const N_WEB: &str = "nWeb";
pub const TRUSS_TYPE: &str = "trussType";
pub const E_MOD: &str = "eMod";
pub const AREA: &str = "area";
pub const DEFAULT_PROPS: &str = "defaultProps";
pub const CATEGORY: &str = "cat";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareState {
    pub category: TrussCategory,
    pub params: ParametricParams,
    pub nodes: Vec<Node>,
    pub members: Vec<Member>,
    /// One line per token that needed default substitutions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Query values grouped by key, in arrival order.
struct QueryParams {
    values: HashMap<String, Vec<String>>,
}

impl QueryParams {
    fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            values
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        Self { values }
    }

    fn with<T>(&self, name: &str, decode: impl FnOnce(RawParam<'_>) -> T) -> T {
        match self.values.get(name).map(Vec::as_slice) {
            None | Some([]) => decode(RawParam::Missing),
            Some([only]) => decode(RawParam::One(only)),
            Some(many) => {
                let refs: Vec<&str> = many.iter().map(String::as_str).collect();
                decode(RawParam::Many(&refs))
            }
        }
    }
}

impl ShareState {
    /// A custom-mode state holding `model`.
    pub fn from_custom_model(model: &GeometryModel) -> Self {
        Self {
            category: TrussCategory::Custom,
            nodes: model.nodes().to_vec(),
            members: model.members().to_vec(),
            ..Self::default()
        }
    }

    /// Parse the query string of a page URL, with or without the leading `?`.
    pub fn from_query(query: &str, policy: DecodePolicy) -> Result<Self, CodecError> {
        let params = QueryParams::parse(query);
        let mut warnings = Vec::new();

        let nodes = params.with(CUSTOM_NODES, |raw| codec::decode_nodes(raw, policy))?;
        let members = params.with(CUSTOM_MEMBERS, |raw| codec::decode_members(raw, policy))?;
        let forces = params.with(FORCES, |raw| codec::decode_grid(raw, policy))?;
        let e_mod = params.with(E_MOD, |raw| {
            codec::decode_group_props(E_MOD, raw, MemberGroupProps::DEFAULT_E_MOD, policy)
        })?;
        let area = params.with(AREA, |raw| {
            codec::decode_group_props(AREA, raw, MemberGroupProps::DEFAULT_AREA, policy)
        })?;
        note(&mut warnings, CUSTOM_NODES, &nodes);
        note(&mut warnings, CUSTOM_MEMBERS, &members);
        note(&mut warnings, FORCES, &forces);
        note(&mut warnings, E_MOD, &e_mod);
        note(&mut warnings, AREA, &area);

        let defaults = ParametricParams::default();
        let number = |name: &str, fallback: f64| {
            params
                .with(name, codec::decode_number)
                .unwrap_or(fallback)
        };
        let n_web = params
            .with(N_WEB, codec::decode_number)
            .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
            .map_or(defaults.n_web, |n| n as u32);
        let truss_type = params
            .with(TRUSS_TYPE, |raw| raw.value().map(TrussType::parse))
            .unwrap_or_default();
        let params_state = ParametricParams {
            span: number(SPAN, defaults.span),
            height: number(HEIGHT, defaults.height),
            depth: number(DEPTH, defaults.depth),
            n_web,
            e_mod: e_mod.value.unwrap_or(defaults.e_mod),
            area: area.value.unwrap_or(defaults.area),
            default_props: params
                .with(DEFAULT_PROPS, codec::decode_bool)
                .unwrap_or(defaults.default_props),
            forces: forces.value,
            truss_type,
        };

        let nodes = nodes.into_value();
        let category = params.with(CATEGORY, codec::decode_category).unwrap_or_else(|| {
            if nodes.is_empty() {
                params_state.truss_type.category()
            } else {
                TrussCategory::Custom
            }
        });

        Ok(Self {
            category,
            params: params_state,
            nodes,
            members: members.into_value(),
            warnings,
        })
    }

    /// Parse the query part of a full share link.
    pub fn from_url(link: &str, policy: DecodePolicy) -> Result<Self, crate::TrussError> {
        let url = Url::parse(link)?;
        Ok(Self::from_query(url.query().unwrap_or_default(), policy)?)
    }

    /// Serialize the parameters of the active mode. Parametric values equal
    /// to their defaults and empty tokens are left out.
    pub fn to_query(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        out.append_pair(CATEGORY, self.category.as_str());

        if self.category == TrussCategory::Custom {
            let nodes = codec::encode_nodes(Some(&self.nodes));
            let members = codec::encode_members(Some(&self.members));
            append_token(&mut out, CUSTOM_NODES, nodes);
            append_token(&mut out, CUSTOM_MEMBERS, members);
            return out.finish();
        }

        let defaults = ParametricParams::default();
        let p = &self.params;
        for (name, value, default) in [
            (SPAN, p.span, defaults.span),
            (HEIGHT, p.height, defaults.height),
            (DEPTH, p.depth, defaults.depth),
        ] {
            if value != default {
                out.append_pair(name, &codec::format_number(value));
            }
        }
        if p.n_web != defaults.n_web {
            out.append_pair(N_WEB, &p.n_web.to_string());
        }
        if p.truss_type != defaults.truss_type {
            out.append_pair(TRUSS_TYPE, p.truss_type.as_str());
        }
        if p.default_props != defaults.default_props {
            out.append_pair(DEFAULT_PROPS, codec::encode_bool(p.default_props));
        }
        if p.e_mod != defaults.e_mod {
            append_token(&mut out, E_MOD, codec::encode_group_props(Some(&p.e_mod)));
        }
        if p.area != defaults.area {
            append_token(&mut out, AREA, codec::encode_group_props(Some(&p.area)));
        }
        append_token(&mut out, FORCES, codec::encode_grid(p.forces.as_deref()));
        out.finish()
    }

    /// The custom nodes and members as a model. Members that reference a
    /// missing node are dropped.
    pub fn custom_model(&self) -> GeometryModel {
        let mut model = GeometryModel::new();
        for node in &self.nodes {
            if let Err(err) = model.add_node(*node) {
                log::warn!("skipping node: {err}");
            }
        }
        for member in &self.members {
            if let Err(err) = model.add_member(*member) {
                log::warn!("dropping member: {err}");
            }
        }
        model
    }
}

fn append_token(
    out: &mut form_urlencoded::Serializer<'_, String>,
    name: &str,
    token: Option<String>,
) {
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        out.append_pair(name, &token);
    }
}

fn note<T>(warnings: &mut Vec<String>, name: &str, decoded: &Decoded<T>) {
    if !decoded.is_clean() {
        warnings.push(format!(
            "{name}: entries {:?} could not be read and were replaced with defaults",
            decoded.substituted
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SupportType;

    #[test]
    fn empty_query_is_default_bridge() {
        let state = ShareState::from_query("", DecodePolicy::Lenient).unwrap();
        assert_eq!(state, ShareState::default());
        assert_eq!(state.to_query(), "cat=bridge");
    }

    #[test]
    fn decodes_parametric_link() {
        let state = ShareState::from_query(
            concat!(
                "?span=24&height=6&nWeb=3&trussType=FinkRoofTruss&defaultProps=0",
                "&eMod=top-30000_bot-29000_web-29000&zforces=0_0_-5%2C1_0_-5",
            ),
            DecodePolicy::Strict,
        )
        .unwrap();
        assert_eq!(state.category, TrussCategory::Roof);
        assert_eq!(state.params.span, 24.0);
        assert_eq!(state.params.n_web, 3);
        assert_eq!(state.params.truss_type, TrussType::FinkRoof);
        assert!(!state.params.default_props);
        assert_eq!(state.params.e_mod.top, 30000.0);
        assert_eq!(state.params.area, MemberGroupProps::uniform(5.0));
        assert_eq!(
            state.params.forces,
            Some(vec![vec![0.0, 0.0, -5.0], vec![1.0, 0.0, -5.0]])
        );
    }

    #[test]
    fn category_inferred_from_custom_nodes() {
        let state = ShareState::from_query("cnodes=0~0~p~0~0", DecodePolicy::Lenient).unwrap();
        assert_eq!(state.category, TrussCategory::Custom);
        let explicit =
            ShareState::from_query("cat=roof&cnodes=0~0~p~0~0", DecodePolicy::Lenient).unwrap();
        assert_eq!(explicit.category, TrussCategory::Roof);
    }

    #[test]
    fn parametric_round_trip() {
        let state = ShareState {
            category: TrussCategory::Roof,
            params: ParametricParams {
                span: 30.5,
                depth: 2.25,
                truss_type: TrussType::Scissor,
                default_props: false,
                area: MemberGroupProps {
                    top: 6.0,
                    bot: 5.5,
                    web: 3.0,
                },
                forces: Some(vec![vec![2.0, 1.5, -8.0]]),
                ..ParametricParams::default()
            },
            ..ShareState::default()
        };
        let query = state.to_query();
        assert!(!query.contains("cnodes"));
        assert_eq!(ShareState::from_query(&query, DecodePolicy::Strict).unwrap(), state);
    }

    #[test]
    fn custom_mode_writes_only_custom_tokens() {
        let state = ShareState {
            category: TrussCategory::Custom,
            params: ParametricParams {
                span: 99.0,
                ..ParametricParams::default()
            },
            nodes: vec![Node::new(0.0, 0.0).with_support(SupportType::Pin), Node::new(3.0, 0.0)],
            members: vec![Member::new(0, 1, 2.0, 29000.0)],
            warnings: Vec::new(),
        };
        let query = state.to_query();
        assert!(query.starts_with("cat=custom&cnodes="));
        assert!(!query.contains("span"));
        let back = ShareState::from_query(&query, DecodePolicy::Strict).unwrap();
        assert_eq!(back.nodes, state.nodes);
        assert_eq!(back.members, state.members);
        assert_eq!(back.params, ParametricParams::default());
    }

    #[test]
    fn empty_custom_structure_omits_tokens() {
        let state = ShareState::from_custom_model(&GeometryModel::new());
        assert_eq!(state.to_query(), "cat=custom");
    }

    #[test]
    fn warnings_collect_substitutions() {
        let state =
            ShareState::from_query("cnodes=0~0~p~0~0_garbage&cmems=0~1~1", DecodePolicy::Lenient)
                .unwrap();
        assert_eq!(state.nodes.len(), 2);
        assert_eq!(state.warnings.len(), 2);
        assert!(state.warnings[0].starts_with("cnodes"));

        let strict = ShareState::from_query("cnodes=0~0~p~0~0_garbage", DecodePolicy::Strict);
        assert!(strict.is_err());
    }

    #[test]
    fn repeated_keys_use_first_value() {
        let state = ShareState::from_query("span=10&span=20", DecodePolicy::Lenient).unwrap();
        assert_eq!(state.params.span, 10.0);
    }

    #[test]
    fn bad_scalars_fall_back_to_defaults() {
        let state =
            ShareState::from_query("span=wide&nWeb=-2&defaultProps=maybe", DecodePolicy::Strict)
                .unwrap();
        assert_eq!(state.params, ParametricParams::default());
    }

    #[test]
    fn from_full_url() {
        let state = ShareState::from_url(
            "https://example.com/truss?cat=custom&cnodes=0~0~p~0~0_10~5~f~-2~3&cmems=0~1~2~29000",
            DecodePolicy::Strict,
        )
        .unwrap();
        assert_eq!(state.custom_model().member_count(), 1);
        assert!(ShareState::from_url("not a url", DecodePolicy::Strict).is_err());
    }

    #[test]
    fn custom_model_drops_dangling_members() {
        let link = "cnodes=0~0~p~0~0_1~0~r~0~0&cmems=0~1~1~1_1~5~1~1";
        let state = ShareState::from_query(link, DecodePolicy::Strict).unwrap();
        let model = state.custom_model();
        assert_eq!(model.node_count(), 2);
        assert_eq!(model.member_count(), 1);
    }
}
