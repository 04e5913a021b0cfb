//! Fixed prompt blocks
//!
//! These constants are the contract between the pipeline and the synthesized
//! code: [`PPTX_RULES`] encodes the known crash-prone misuses of the slide
//! library, [`TOOLKIT_SPEC`] is the authoritative surface of the high-level
//! drawing toolkit (names, parameters, units), and [`OUTPUT_CONTRACT`]
//! demands raw source with no surrounding prose.

/// Slide-library rulebook injected into every code-producing prompt
pub const PPTX_RULES: &str = r#"*** CRITICAL PYTHON-PPTX RULES (MUST FOLLOW) ***
1. **Lines are CONNECTORS**:
   - NEVER use `slide.shapes.add_shape(MSO_SHAPE.LINE, ...)` -> This causes AttributeError.
   - ALWAYS use `slide.shapes.add_connector(MSO_CONNECTOR.X, ...)`.
   - **Valid Types**: `MSO_CONNECTOR.STRAIGHT`, `MSO_CONNECTOR.ELBOW`, `MSO_CONNECTOR.CURVE`.
   - **INVALID**: Do NOT use `MSO_CONNECTOR.CURVED` (No 'D' at the end).
   - **INVALID SHAPES**: `MSO_SHAPE.DOC_TAG` does not exist (Use `MSO_SHAPE.FOLDED_CORNER` instead).

2. **Connector Properties**:
   - Connectors (Lines/Arrows) have `.line` but **NO `.fill`**.
   - NEVER try to set `connector.fill.solid()`. Only set `connector.line.color.rgb`.

3. **Shape Fills (NO ONE-LINERS)**:
   - **NEVER** create and color a shape in one line: `add_shape(...).fill.fore_color.rgb = ...` (TypeError).
   - **ALWAYS** split into steps:
     1. `shape = slide.shapes.add_shape(...)`
     2. `shape.fill.solid()`  <-- REQUIRED first!
     3. `shape.fill.fore_color.rgb = RGBColor(...)`

4. **Imports & Enums (STRICT)**:
   - Use these exact imports to avoid ImportErrors:
     from pptx import Presentation
     from pptx.util import Inches, Pt, Cm
     from pptx.dml.color import RGBColor
     from pptx.enum.shapes import MSO_SHAPE, MSO_CONNECTOR
     from pptx.enum.dml import MSO_LINE_DASH_STYLE
     from pptx.enum.text import PP_ALIGN, MSO_ANCHOR, MSO_AUTO_SIZE
   - **FORBIDDEN IMPORTS (DO NOT USE)**:
     - `MSO_ARROWHEAD` (Does not exist. Use tools for arrows).
     - `MSO_TEXT_ORIENTATION` (Causes ImportError. Do not rotate text via enum).
   - **Line Dashes**: Use `line.dash_style = MSO_LINE_DASH_STYLE.DASH`.

5. **Text Frames**:
   - Always check `if shape.has_text_frame:` before accessing text properties.

6. **Text Styling & Helper Functions**:
   - If you define a helper like `def add_text(...)`, **DO NOT** invent arguments like
     `style='italic'` when calling it.
   - **Italic**: `run.font.italic = True`. **Bold**: `run.font.bold = True`.
     **Underline**: `run.font.underline = True`. Set attributes explicitly on the font object.

7. **Color Assignment Safety (CRITICAL)**:
   - The `.rgb` property ONLY accepts **`RGBColor` objects**.
   - It **REJECTS** `None`, tuples (e.g. `(255,0,0)`), and hex strings.
   - If you have a tuple `(r, g, b)`, wrap it: `RGBColor(r, g, b)`.

8. **Coordinate Precision & Type Safety (CRITICAL)**:
   - **Integers Only**: Coordinates (x,y,w,h) MUST be integers (EMUs).
   - Python division (`/`) produces floats; floats crash `python-pptx` XML generation.
   - **FIX**: Always wrap calculations in `int()`: `int(Cm(4) * 1.5)`.
   - The result of `Inches(1) + Inches(2)` is a plain `int`: **NEVER** access `.inches`,
     `.cm`, or `.pt` on a coordinate variable (AttributeError).

9. **Tools Usage**:
   - Check if you need to draw arrows. If yes, `from tools import add_connector`.
   - **Do not redefine** these functions. They are already available in `tools.py`."#;

/// Drawing-toolkit capability specification
///
/// This block is the specification of the external drawing API that
/// generated code must conform to: which operations exist, their exact
/// parameter names, and their units (raw-float inches for tool calls,
/// `Inches()`/`Cm()` wrappers for native calls).
pub const TOOLKIT_SPEC: &str = r#"*** HIGH-PRIORITY TOOLS SPECIFICATION ***

You have access to a local library `tools.py` providing high-level plotting capabilities.
**Always prioritize these tools over native `python-pptx` methods for best visual quality.**

Global Rules:
1. **Imports**: ALWAYS `from tools import *`.
2. **Coordinate Units**:
   - For **Tools** (`add_block`, `add_connector`, ...): use **raw floats** in inches (e.g. `left=5.0`).
   - For **Native PPTX** (`slide.shapes.add_shape`): use **`Inches()`** wrappers.
3. **Routing**: Do not calculate connection indices manually; the tools align automatically.
4. **Objects**: Pass Shape/Picture objects to connector functions, not their names.
5. **Strict Parameter Compliance**: The signatures below are EXHAUSTIVE. Do NOT invent
   parameters (no linestyle, dashed, shadow, end_arrow unless listed).

Tool 1: `add_container(slide, x, y, w, h, title=None, fill_color='F5F5F5', stroke_color='CCCCCC', alpha=1.0)`
  Background rectangle that visually groups elements. Call FIRST (layer 1) so it stays behind.
  `title` adds a bold heading inside the top edge; `alpha` 0.1-0.3 gives a subtle background.

Tool 2: `add_block(slide, x, y, w, h, text=None, fill_color='FFFFFF', stroke_color='000000',
         shape_type=MSO_SHAPE.ROUNDED_RECTANGLE, font_size=12, font_color='000000', bold=False, alpha=1.0)`
  The primary node/box tool; handles text centering, safe fills, borders, transparency.
  `shape_type` STRICTLY one of: MSO_SHAPE.RECTANGLE, ROUNDED_RECTANGLE, SNIP_1_RECTANGLE,
  OVAL, DIAMOND, ISOSCELES_TRIANGLE, HEXAGON, PENTAGON, RIGHT_ARROW, LEFT_ARROW, UP_ARROW,
  DOWN_ARROW, CHEVRON, CLOUD, HEART, TEAR.

Tool 3: `add_label(slide, text, x, y, w=None, h=None, font_size=12, color='000000', bold=False, align='center')`
  Pure text, no background/border. `w=None` auto-sizes the box. `align`: 'left'|'center'|'right'.

Tool 4: `add_connector(slide, source_shape, dest_shape, type='curve', color='1F4E79', width=3.0,
         gradient_start=None, gradient_end=None, arrow_size=None)`
  Smart arrow between two existing shape objects. `type`: 'curve' (horizontal flows),
  'elbow' (vertical hierarchies), 'straight'. `width` in points. Solid line: give `color`;
  gradient: give both `gradient_start` and `gradient_end`. `arrow_size`: 'sm'|'med'|'lg'
  (default auto from width). Cannot route around obstacles; for complex paths use
  `add_custom_route_arrow` instead.

Tool 5: `add_free_arrow(slide, start_x, start_y, end_x, end_y, type='straight', color='1F4E79',
         width=3.0, gradient_start=None, gradient_end=None)`
  Arrow between two absolute (x, y) coordinates in raw inches; for annotations and axis
  lines not attached to shapes.

Tool 6: `add_custom_route_arrow(slide, points, color='333333', width=2.0, end_arrow=True)`
  Multi-segment polyline arrow through an ordered list of `(x, y)` float tuples (raw
  inches, do NOT use `Inches()`). Use when `add_connector` cannot route correctly:
  L-shapes `[Start, Corner, End]`, C-shape bypasses, U-turn feedbacks. Plan the path with
  a "lane": pick an empty x or y coordinate as a highway, then Start -> Lane -> End."#;

/// Raw-source output contract appended to every code-producing prompt
pub const OUTPUT_CONTRACT: &str = r#"!!! IMPORTANT OUTPUT FORMAT !!!
1. Return **RAW Python code** only.
2. **DO NOT** use Markdown code blocks (no ```python).
3. **DO NOT** write any introduction, explanation, or summary.
4. The output must start directly with `import` and end with the save command."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toolkit_spec_names_every_operation() {
        for tool in [
            "add_container",
            "add_block",
            "add_label",
            "add_connector",
            "add_free_arrow",
            "add_custom_route_arrow",
        ] {
            assert!(TOOLKIT_SPEC.contains(tool), "missing {tool}");
        }
    }

    #[test]
    fn output_contract_demands_raw_source() {
        assert!(OUTPUT_CONTRACT.contains("RAW Python code"));
        assert!(PPTX_RULES.contains("MSO_CONNECTOR"));
    }
}
