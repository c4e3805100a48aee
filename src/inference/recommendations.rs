//! # Tabelas de Recomendação
//!
//! A política de recomendações é expressa como **tabelas de consulta**,
//! não como cadeias de `if`:
//!
//! | Tabela | Chave | Valor |
//! |--------|-------|-------|
//! | [`tier_guidance`] | [`RiskTier`] | lista fixa e ordenada de orientações |
//! | [`CONDITION_ADDENDA`] | identificador da condição principal | uma linha específica |
//!
//! A montagem final fica em [`build_recommendations`]:
//!
//! ```text
//! orientações do nível
//!   + (opcional) adendo da condição de maior score
//!   + (opcional) alerta de red flag sem condição compatível
//!   + aviso legal (sempre)
//! ```

use crate::core::RiskTier;

/// Aviso legal anexado a toda lista de recomendações.
pub const DISCLAIMER: &str =
    "Lembre-se: Este é um sistema de triagem, não substitui diagnóstico profissional";

/// Anexado quando há red flags mas nenhuma condição casou.
pub const RED_FLAG_ALERT: &str =
    "⚠️ Sintomas de alerta detectados - Busque avaliação profissional";

/// Única recomendação para conjunto de fatos vazio.
pub const EMPTY_INPUT_RECOMMENDATION: &str =
    "Monitorar possíveis sintomas e buscar avaliação se necessário.";

const ALTO: &[&str] = &[
    "🚨 AVALIAÇÃO IMEDIATA - Busque atendimento de emergência",
    "📞 Contate CVV (188) ou serviço de saúde mental urgentemente",
    "👥 Não deixe a pessoa sozinha até receber atendimento",
    "🏥 Procure um hospital ou serviço de emergência psiquiátrica",
];

const MEDIO: &[&str] = &[
    "📞 Agendar consulta com psiquiatra/psicólogo esta semana",
    "📊 Monitorar sintomas diariamente",
    "👥 Buscar apoio familiar ou de amigos",
    "💊 Avaliar necessidade de intervenção farmacológica",
];

const BAIXO: &[&str] = &[
    "👥 Agendar avaliação com profissional de saúde",
    "💪 Praticar autocuidado e monitorar evolução",
    "📝 Manter diário de sintomas",
    "🧘 Considerar psicoterapia como prevenção",
];

const MINIMO: &[&str] = &[
    "💡 Manter hábitos saudáveis e observar possíveis mudanças",
    "🏃 Praticar atividade física regular",
    "🍎 Manter alimentação balanceada",
    "😴 Cuidar da qualidade do sono",
];

/// Adendos por condição principal: (identificadores, linha).
pub const CONDITION_ADDENDA: &[(&[&str], &str)] = &[
    (
        &["depressao"],
        "Específico para depressão: Atividade física regular e psicoterapia",
    ),
    (
        &["ansiedade", "transtorno_panico", "crise_ansiedade"],
        "Específico para ansiedade: Técnicas de respiração e mindfulness",
    ),
    (
        &["crise_suicida"],
        "INTERVENÇÃO IMEDIATA: Risco suicida ativo detectado",
    ),
];

/// Orientações genéricas de um nível de risco.
pub fn tier_guidance(tier: RiskTier) -> &'static [&'static str] {
    match tier {
        RiskTier::Alto => ALTO,
        RiskTier::Medio => MEDIO,
        RiskTier::Baixo => BAIXO,
        RiskTier::Minimo => MINIMO,
    }
}

/// Adendo específico para a condição de maior score, se houver.
pub fn condition_addendum(condicao: &str) -> Option<&'static str> {
    CONDITION_ADDENDA
        .iter()
        .find(|(ids, _)| ids.contains(&condicao))
        .map(|(_, linha)| *linha)
}

/// Monta a lista final de recomendações.
///
/// - `top_condition` — condição de maior score (`None` se nada casou)
/// - `red_flags_without_match` — há red flags nos fatos mas nenhuma condição casou
pub fn build_recommendations(
    tier: RiskTier,
    top_condition: Option<&str>,
    red_flags_without_match: bool,
) -> Vec<String> {
    let mut recs: Vec<String> = tier_guidance(tier).iter().map(|s| s.to_string()).collect();

    if let Some(linha) = top_condition.and_then(condition_addendum) {
        recs.push(linha.to_string());
    }
    if red_flags_without_match {
        recs.push(RED_FLAG_ALERT.to_string());
    }
    recs.push(DISCLAIMER.to_string());
    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_has_four_lines_and_disclaimer() {
        for tier in [RiskTier::Minimo, RiskTier::Baixo, RiskTier::Medio, RiskTier::Alto] {
            let recs = build_recommendations(tier, None, false);
            assert_eq!(recs.len(), 5);
            assert_eq!(recs.last().map(String::as_str), Some(DISCLAIMER));
        }
    }

    #[test]
    fn alto_asks_not_to_leave_person_alone() {
        let recs = build_recommendations(RiskTier::Alto, None, false);
        assert!(recs[0].contains("emergência"));
        assert!(recs.iter().any(|r| r.contains("Não deixe a pessoa sozinha")));
    }

    #[test]
    fn addendum_follows_top_condition() {
        let recs = build_recommendations(RiskTier::Medio, Some("transtorno_panico"), false);
        assert_eq!(recs[4], "Específico para ansiedade: Técnicas de respiração e mindfulness");
        assert_eq!(
            condition_addendum("crise_suicida"),
            Some("INTERVENÇÃO IMEDIATA: Risco suicida ativo detectado")
        );
        assert_eq!(condition_addendum("burnout"), None);
    }

    #[test]
    fn red_flag_alert_precedes_disclaimer() {
        let recs = build_recommendations(RiskTier::Alto, None, true);
        assert_eq!(recs[recs.len() - 2], RED_FLAG_ALERT);
        assert_eq!(recs[recs.len() - 1], DISCLAIMER);
    }
}
