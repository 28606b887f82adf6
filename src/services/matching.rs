//! Property-to-owner matching engine
//!
//! Resolves a free-text property name (and optionally the guest email)
//! against the owner registry using ordered fallback strategies, each tagged
//! with a confidence score. Name-based matches take precedence over the email
//! signal; that ordering is business policy and must not change.

use serde::Serialize;

use crate::{
    config::MatchingConfig,
    error::AppResult,
    models::{enums::MatchMethod, owner::OwnerProfile},
    repository::owners::OwnersRepository,
};

/// A resolved match with its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyMatch {
    pub owner_id: String,
    pub property_id: Option<String>,
    pub property_name: String,
    pub confidence: f64,
    pub method: MatchMethod,
}

#[derive(Clone)]
pub struct MatchingService {
    owners: OwnersRepository,
    config: MatchingConfig,
}

impl MatchingService {
    pub fn new(owners: OwnersRepository, config: MatchingConfig) -> Self {
        Self { owners, config }
    }

    /// Find the best owner/property match for a booking's property name.
    ///
    /// Strategy order: exact name (1.0), fuzzy substring (capped at 0.9),
    /// token-set similarity (Jaccard, accepted at or above the configured
    /// threshold and only probed when the first two found nothing). The
    /// guest-email signal (0.9) is collected independently and used only
    /// when no name-based match clears the confidence floor. Score ties
    /// break by registry scan order, first seen wins.
    pub async fn find_match(
        &self,
        property_name: &str,
        guest_email: Option<&str>,
    ) -> AppResult<Option<PropertyMatch>> {
        let profiles = self.owners.list_profiles().await?;
        let query = property_name.trim().to_lowercase();
        if query.is_empty() {
            return Ok(None);
        }

        let mut exact: Option<PropertyMatch> = None;
        let mut best_fuzzy: Option<PropertyMatch> = None;
        let mut email: Option<PropertyMatch> = None;

        for profile in &profiles {
            if email.is_none() {
                if let Some(guest_email) = guest_email {
                    if !guest_email.trim().is_empty()
                        && profile.email.trim().eq_ignore_ascii_case(guest_email.trim())
                    {
                        email = Some(email_match(profile));
                    }
                }
            }

            for property in &profile.properties {
                let target = property.name.trim().to_lowercase();

                if exact.is_none() && target == query {
                    exact = Some(PropertyMatch {
                        owner_id: profile.id.clone(),
                        property_id: Some(property.id.clone()),
                        property_name: property.name.clone(),
                        confidence: 1.0,
                        method: MatchMethod::Exact,
                    });
                }

                if target.contains(&query) || query.contains(&target) {
                    let confidence = fuzzy_confidence(&query, &target);
                    // Strict comparison keeps the first-seen candidate on ties.
                    if best_fuzzy
                        .as_ref()
                        .map_or(true, |best| confidence > best.confidence)
                    {
                        best_fuzzy = Some(PropertyMatch {
                            owner_id: profile.id.clone(),
                            property_id: Some(property.id.clone()),
                            property_name: property.name.clone(),
                            confidence,
                            method: MatchMethod::Fuzzy,
                        });
                    }
                }
            }
        }

        let name_match = if exact.is_some() {
            exact
        } else if best_fuzzy.is_some() {
            best_fuzzy
        } else {
            self.best_token_similarity(&query, &profiles)
        };

        tracing::debug!(
            query = %property_name,
            method = name_match.as_ref().map(|m| m.method.as_str()).unwrap_or("none"),
            confidence = name_match.as_ref().map(|m| m.confidence).unwrap_or(0.0),
            email_signal = email.is_some(),
            "Property match scan complete"
        );

        // Name-based precedence: a confident name match wins, then the email
        // signal, then whatever low-confidence name match remains.
        Ok(match name_match {
            Some(candidate) if candidate.confidence > self.config.name_confidence_floor => {
                Some(candidate)
            }
            candidate => email.or(candidate),
        })
    }

    /// Token-set Jaccard fallback, probed only when exact and fuzzy found
    /// nothing. Accepts scores at or above the configured threshold.
    fn best_token_similarity(
        &self,
        query: &str,
        profiles: &[OwnerProfile],
    ) -> Option<PropertyMatch> {
        let mut best: Option<PropertyMatch> = None;
        for profile in profiles {
            for property in &profile.properties {
                let target = property.name.trim().to_lowercase();
                let score = jaccard(query, &target);
                if score >= self.config.similarity_threshold
                    && best.as_ref().map_or(true, |b| score > b.confidence)
                {
                    best = Some(PropertyMatch {
                        owner_id: profile.id.clone(),
                        property_id: Some(property.id.clone()),
                        property_name: property.name.clone(),
                        confidence: score,
                        method: MatchMethod::AiSimilarity,
                    });
                }
            }
        }
        best
    }
}

fn email_match(profile: &OwnerProfile) -> PropertyMatch {
    let first_property = profile.properties.first();
    PropertyMatch {
        owner_id: profile.id.clone(),
        property_id: first_property.map(|p| p.id.clone()),
        property_name: first_property
            .map(|p| p.name.clone())
            .unwrap_or_default(),
        confidence: 0.9,
        method: MatchMethod::EmailMatch,
    }
}

/// Fuzzy confidence: matched tokens over the larger token count, capped at
/// 0.9 so fuzzy never outranks an exact match. A query token counts as
/// matched when it and some target token contain one another either way.
fn fuzzy_confidence(query: &str, target: &str) -> f64 {
    let query_tokens: Vec<&str> = query.split_whitespace().collect();
    let target_tokens: Vec<&str> = target.split_whitespace().collect();
    if query_tokens.is_empty() || target_tokens.is_empty() {
        return 0.0;
    }

    let matched = query_tokens
        .iter()
        .filter(|q| {
            target_tokens
                .iter()
                .any(|t| t.contains(*q) || q.contains(t))
        })
        .count();

    let denominator = query_tokens.len().max(target_tokens.len()) as f64;
    (matched as f64 / denominator).min(0.9)
}

/// Jaccard index over whitespace-split lower-cased token sets.
fn jaccard(query: &str, target: &str) -> f64 {
    use std::collections::HashSet;

    let query_tokens: HashSet<&str> = query.split_whitespace().collect();
    let target_tokens: HashSet<&str> = target.split_whitespace().collect();
    let union = query_tokens.union(&target_tokens).count();
    if union == 0 {
        return 0.0;
    }
    query_tokens.intersection(&target_tokens).count() as f64 / union as f64
}
