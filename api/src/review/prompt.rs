//! Fixed review templates and comment composition.
//!
//! Both event kinds share the reviewer persona (hexagonal architecture,
//! separation of concerns, object orientation) and ask for GitLab markdown.
//! The push template frames the summary as a changelog and asks nine
//! questions instead of ten; only push comments echo the questions back.

use ai_llm_service::ChatMessage;

use crate::review::review_client::ReviewText;

/// Suffix of every posted comment, whatever the generation outcome.
pub const ATTRIBUTION_FOOTER: &str =
    "\n\nEste comentario fue generado por un pato de inteligencia artificial.";

/* ------------------------------------------------------------------------- */
/* Merge request                                                             */
/* ------------------------------------------------------------------------- */

const MR_SYSTEM: &str = "Eres un desarrollador senior especializado en arquitectura de software, revisando cambios de código con enfoque en arquitectura hexagonal, separación de responsabilidades, orientación a objetos y mejores prácticas de desarrollo.";

const MR_PRE_PROMPT: &str = "Revisa los siguientes cambios de código git diff, enfocándote en estructura, seguridad, claridad, arquitectura hexagonal, separación de responsabilidades y orientación a objetos.";

pub const MR_QUESTIONS: &str = "
Preguntas:
1. Resume los cambios principales.
2. ¿Es claro el código nuevo/modificado?
3. ¿Son descriptivos los comentarios y nombres?
4. ¿Se puede reducir la complejidad? ¿Ejemplos?
5. ¿Algún bug? ¿Dónde?
6. ¿Problemas de seguridad potenciales?
7. ¿Los cambios respetan la arquitectura hexagonal (puertos y adaptadores)?
8. ¿Hay una adecuada separación de incumbencias (responsabilidades)?
9. ¿El código está bien orientado a objetos (encapsulación, herencia, polimorfismo)?
10. ¿Sugerencias para alineación con mejores prácticas?
";

const MR_ASSISTANT: &str = "Responde en markdown compatible con GitLab. Incluye una versión concisa de cada pregunta en tu respuesta, prestando especial atención a los aspectos arquitectónicos y de diseño.";

pub const MR_FALLBACK: &str =
    "Lo siento, no me siento bien hoy. Por favor, pide a un humano que revise este PR.";

/* ------------------------------------------------------------------------- */
/* Push                                                                      */
/* ------------------------------------------------------------------------- */

const PUSH_SYSTEM: &str = "Eres un desarrollador senior especializado en arquitectura de software, revisando cambios de código de un commit con enfoque en arquitectura hexagonal, separación de responsabilidades, orientación a objetos y mejores prácticas de desarrollo.";

const PUSH_PRE_PROMPT: &str = "Revisa el git diff de un commit reciente, enfocándote en claridad, estructura, seguridad, arquitectura hexagonal, separación de responsabilidades y orientación a objetos.";

pub const PUSH_QUESTIONS: &str = "
Preguntas:
1. Resume los cambios (estilo Changelog).
2. ¿Claridad del código agregado/modificado?
3. ¿Adecuación de comentarios y nombres?
4. ¿Simplificación sin romper funcionalidad? ¿Ejemplos?
5. ¿Algún bug? ¿Dónde?
6. ¿Problemas de seguridad potenciales?
7. ¿Los cambios respetan la arquitectura hexagonal (puertos y adaptadores)?
8. ¿Hay una adecuada separación de incumbencias (responsabilidades)?
9. ¿El código está bien orientado a objetos (encapsulación, herencia, polimorfismo)?
";

const PUSH_ASSISTANT: &str = "Responde en markdown para GitLab. Incluye versiones concisas de las preguntas en la respuesta, prestando especial atención a los aspectos arquitectónicos y de diseño.";

const PUSH_QUESTIONS_INTRO: &str = "\n\nPara referencia, me dieron las siguientes preguntas: \n";

pub const PUSH_FALLBACK: &str =
    "Lo siento, no me siento bien hoy. Por favor, pide a un humano que revise este cambio de código.";

/// System, user and assistant-priming turns for a merge request review.
pub fn merge_request_messages(diff: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(MR_SYSTEM),
        ChatMessage::user(format!("{MR_PRE_PROMPT}\n\n{diff}{MR_QUESTIONS}")),
        ChatMessage::assistant(MR_ASSISTANT),
    ]
}

/// System, user and assistant-priming turns for a commit review.
pub fn push_messages(diff: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(PUSH_SYSTEM),
        ChatMessage::user(format!("{PUSH_PRE_PROMPT}\n\n{diff}{PUSH_QUESTIONS}")),
        ChatMessage::assistant(PUSH_ASSISTANT),
    ]
}

/// Note body posted on the merge request.
pub fn merge_request_comment(review: &ReviewText) -> String {
    match review {
        ReviewText::Generated(answer) => format!("{answer}{ATTRIBUTION_FOOTER}"),
        ReviewText::Failed(error) => fallback(MR_FALLBACK, error),
    }
}

/// Comment body posted on the commit. A generated answer is followed by the
/// questions that were asked.
pub fn push_comment(review: &ReviewText) -> String {
    match review {
        ReviewText::Generated(answer) => {
            let mut out = String::with_capacity(answer.len() + PUSH_QUESTIONS.len() + 160);
            out.push_str(answer);
            out.push_str(PUSH_QUESTIONS_INTRO);
            for line in PUSH_QUESTIONS.split('\n') {
                out.push('\n');
                out.push_str(line);
            }
            out.push_str(ATTRIBUTION_FOOTER);
            out
        }
        ReviewText::Failed(error) => fallback(PUSH_FALLBACK, error),
    }
}

fn fallback(apology: &str, error: &str) -> String {
    format!("{apology}\n\nError: {error}{ATTRIBUTION_FOOTER}")
}
